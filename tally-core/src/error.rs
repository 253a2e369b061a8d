//! Error types for the tally core library.
//!
//! Detection outcomes are never errors: an entity that does not match the
//! counting criteria, or an event no actor is close enough to claim, simply
//! produces no count. Only configuration problems and missing host
//! capabilities surface here, and the integration layer degrades both to
//! no-ops rather than crashing the host.

use thiserror::Error;

/// Top-level error type for all tally operations.
#[derive(Error, Debug)]
pub enum TallyError {
    /// Configuration file could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An expected host capability is absent or has an unexpected shape.
    ///
    /// The detection path for that capability must no-op for the rest of
    /// the session.
    #[error("Host capability unavailable: {capability}")]
    Capability {
        /// Which capability failed.
        capability: String,
    },

    /// Generic I/O error (config file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias.
pub type Result<T> = std::result::Result<T, TallyError>;
