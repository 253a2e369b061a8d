//! Per-tick driver wiring the observer to the engine.
//!
//! Veloren invokes three independent entry points: the logic tick, the
//! render frame, and input/connection callbacks. The tick driver owns the
//! engine; a [`SharedTickSystem`] mutex serializes the callback entry
//! points against the tick, while the render frame reads the counter
//! store directly and never takes the lock.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use tally_core::config::TallyConfig;
use tally_core::engine::{StepOutcome, TallyEngine};
use tally_core::store::CounterStore;

use crate::observer::WorldObserver;

/// Owns the engine and drives it once per logic tick.
#[derive(Debug)]
pub struct TickSystem {
    engine: TallyEngine,
    degraded: bool,
}

impl TickSystem {
    /// Create a tick system with a fresh engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: TallyEngine::new(),
            degraded: false,
        }
    }

    /// Mutable access to the engine, for the hook entry points.
    pub fn engine(&mut self) -> &mut TallyEngine {
        &mut self.engine
    }

    /// Shared counter store handle for the render frame.
    #[must_use]
    pub fn store(&self) -> Arc<CounterStore> {
        self.engine.store()
    }

    /// Whether a capability failure has disabled this system for the
    /// session.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Run one logic tick. Returns `None` when nothing ran: the world is
    /// unloaded, the system is degraded, or the observer failed.
    ///
    /// A capability failure degrades the system permanently for the
    /// session — undercounting is acceptable, crashing the host is not.
    pub fn run_tick(
        &mut self,
        observer: &mut dyn WorldObserver,
        config: &TallyConfig,
    ) -> Option<StepOutcome> {
        if self.degraded {
            return None;
        }
        match observer.sample() {
            Ok(Some(snapshot)) => {
                let outcome = self.engine.step(&snapshot, config);
                if outcome != StepOutcome::default() {
                    debug!(?outcome, "tick outcome");
                }
                Some(outcome)
            }
            Ok(None) => None,
            Err(error) => {
                warn!(%error, "world observer failed, disabling for this session");
                self.degraded = true;
                None
            }
        }
    }
}

impl Default for TickSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick system shared between the tick handler and the input/connection
/// callbacks.
pub type SharedTickSystem = Arc<Mutex<TickSystem>>;

/// Wrap a tick system for sharing across host callbacks.
#[must_use]
pub fn into_shared(system: TickSystem) -> SharedTickSystem {
    Arc::new(Mutex::new(system))
}
