//! # tally-core
//!
//! Game-agnostic action-counter engine for a multiplayer game client.
//!
//! The engine turns a low-frequency, eventually-consistent stream of
//! world-state snapshots into discrete, exactly-once-counted events and
//! attributes each to the most plausible actor:
//!
//! - **Snapshot model** — one [`snapshot::WorldSnapshot`] per simulation
//!   step; samples can silently skip intermediate values.
//! - **Deduplication** — [`dedup::DedupLedger`] claims occurrences at
//!   per-step and per-entity-lifetime scope so redundant detection paths
//!   never double-count.
//! - **Deferred classification** — [`pending::PendingQueue`] retries
//!   entities whose payload lags their visibility, up to a tick budget.
//! - **Consumption inference** — [`consumption::ConsumptionTracker`], a
//!   per-actor state machine with missed-frame catch-up and a grace period
//!   for late inventory syncs.
//! - **Attribution** — [`attribution::attribute`], nearest actor within a
//!   per-kind cutoff.
//! - **Counters** — [`store::CounterStore`], the only externally visible
//!   state, safe for concurrent render-thread reads.
//!
//! Everything is single-threaded and step-driven; no failure mode is
//! fatal. An event that cannot be classified or attributed is simply not
//! counted.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attribution;
pub mod config;
pub mod consumption;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod label;
pub mod pending;
pub mod snapshot;
pub mod store;
pub mod types;

pub use config::TallyConfig;
pub use engine::{StepOutcome, TallyEngine};
pub use error::TallyError;
pub use snapshot::WorldSnapshot;
pub use store::CounterStore;
pub use types::*;
