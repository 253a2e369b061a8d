//! Per-actor counter store and the handle→actor index.
//!
//! The only engine state visible outside the step handler. The step thread
//! writes once per step; the renderer reads from a per-frame callback that
//! can run on a different thread and cadence, so both maps are `DashMap`s
//! — safe concurrent read-while-write without a store-wide lock.

use dashmap::DashMap;

use crate::types::{ActorId, TransientHandle};

/// Per-actor tallies plus the transient-handle index the renderer uses to
/// resolve entities to actors without a roster scan.
#[derive(Debug, Default)]
pub struct CounterStore {
    counts: DashMap<ActorId, u32>,
    handles: DashMap<TransientHandle, ActorId>,
}

impl CounterStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit one event to an actor. The entry is created on first
    /// increment.
    pub fn increment(&self, actor: ActorId) {
        *self.counts.entry(actor).or_insert(0) += 1;
    }

    /// Current tally for an actor; zero when the actor has none.
    #[must_use]
    pub fn get(&self, actor: ActorId) -> u32 {
        self.counts.get(&actor).map_or(0, |count| *count)
    }

    /// Refresh the handle→actor mapping for one roster entry, overwriting
    /// any stale handle assignment.
    pub fn bind_handle(&self, handle: TransientHandle, actor: ActorId) {
        self.handles.insert(handle, actor);
    }

    /// Resolve a transient handle to the actor it currently belongs to.
    #[must_use]
    pub fn actor_for_handle(&self, handle: TransientHandle) -> Option<ActorId> {
        self.handles.get(&handle).map(|actor| *actor)
    }

    /// Prune both maps to the currently-observable roster. The sole
    /// eviction mechanism: actors not in this step's snapshot lose their
    /// tally immediately.
    pub fn retain(&self, mut present: impl FnMut(ActorId) -> bool) {
        self.counts.retain(|actor, _| present(*actor));
        self.handles.retain(|_, actor| present(*actor));
    }

    /// Number of actors currently holding a tally.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Whether no actor holds a tally.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Clear everything unconditionally (session reset).
    pub fn reset_all(&self) {
        self.counts.clear();
        self.handles.clear();
    }
}
