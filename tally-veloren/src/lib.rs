//! # tally-veloren — Veloren integration for tally
//!
//! This crate bridges the game-agnostic `tally-core` engine to the
//! Veloren client: it samples the replicated world into snapshots, routes
//! push-style host notifications into the engine, and turns counter state
//! into overlay labels for the renderer.
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                Veloren client                │
//! │  ┌───────────────────────────────────────┐  │
//! │  │            tally-veloren              │  │
//! │  │  observer ─▶ systems ─▶ overlay       │  │
//! │  │     ▲           │                     │  │
//! │  │   bridge      hooks                   │  │
//! │  │                 │                     │  │
//! │  │          ┌──────▼──────┐              │  │
//! │  │          │  tally-core │              │  │
//! │  │          └─────────────┘              │  │
//! │  └───────────────────────────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `observer` — the host capability trait producing per-step snapshots
//! - `bridge` — raw host values → core types
//! - `hooks` — push-style entry points (spawns, disconnect, reset)
//! - `systems` — the per-tick driver with capability degradation
//! - `overlay` — counter state → floating labels for the renderer
//! - `config` — `tally.toml` load/save

pub mod bridge;
pub mod config;
pub mod hooks;
pub mod observer;
pub mod overlay;
pub mod systems;
