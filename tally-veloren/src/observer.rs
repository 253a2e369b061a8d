//! The host world observer capability.
//!
//! The core engine never touches Veloren state directly; once per tick the
//! driver asks an observer for a [`WorldSnapshot`]. The trait doubles as
//! the version boundary against host-API drift: an adapter that cannot
//! read a capability it needs reports `TallyError::Capability` and the
//! driver degrades to a no-op for the rest of the session.

use std::collections::VecDeque;

use tally_core::error::{Result, TallyError};
use tally_core::snapshot::WorldSnapshot;

/// Per-tick read access to the replicated world.
pub trait WorldObserver {
    /// Sample the world for this tick.
    ///
    /// `Ok(None)` means the world is not loaded and the engine should
    /// no-op this tick.
    ///
    /// # Errors
    /// `TallyError::Capability` when an expected host ability is absent or
    /// misshapen; the caller must stop using this observer.
    fn sample(&mut self) -> Result<Option<WorldSnapshot>>;
}

#[derive(Debug)]
enum ScriptEntry {
    Snapshot(WorldSnapshot),
    Unloaded,
    Failure(String),
}

/// Observer fed from a pre-built script of ticks. Used by tests and
/// benches; an exhausted script reads as "world unloaded".
#[derive(Debug, Default)]
pub struct ScriptedObserver {
    script: VecDeque<ScriptEntry>,
}

impl ScriptedObserver {
    /// Create an observer with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a loaded-world snapshot for the next tick.
    pub fn push_snapshot(&mut self, snapshot: WorldSnapshot) {
        self.script.push_back(ScriptEntry::Snapshot(snapshot));
    }

    /// Queue an unloaded-world tick.
    pub fn push_unloaded(&mut self) {
        self.script.push_back(ScriptEntry::Unloaded);
    }

    /// Queue a capability failure.
    pub fn push_failure(&mut self, capability: impl Into<String>) {
        self.script.push_back(ScriptEntry::Failure(capability.into()));
    }
}

impl WorldObserver for ScriptedObserver {
    fn sample(&mut self) -> Result<Option<WorldSnapshot>> {
        match self.script.pop_front() {
            Some(ScriptEntry::Snapshot(snapshot)) => Ok(Some(snapshot)),
            Some(ScriptEntry::Unloaded) | None => Ok(None),
            Some(ScriptEntry::Failure(capability)) => {
                Err(TallyError::Capability { capability })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_script_reads_as_unloaded() {
        let mut observer = ScriptedObserver::new();
        observer.push_snapshot(WorldSnapshot::default());
        assert!(matches!(observer.sample(), Ok(Some(_))));
        assert!(matches!(observer.sample(), Ok(None)));
    }

    #[test]
    fn failure_carries_the_capability_name() {
        let mut observer = ScriptedObserver::new();
        observer.push_failure("entity_roster");
        match observer.sample() {
            Err(TallyError::Capability { capability }) => {
                assert_eq!(capability, "entity_roster");
            }
            other => panic!("expected capability error, got {other:?}"),
        }
    }
}
