//! Per-step world snapshot data model.
//!
//! The engine never touches the host world directly. Once per simulation
//! step the integration layer's observer produces a [`WorldSnapshot`] —
//! a pure read of everything the engine needs: the roster of observable
//! actors and the currently visible tracked entities. Sampling is
//! low-frequency and eventually consistent: stack counts can skip
//! intermediate values between snapshots, and an entity's payload can lag
//! its visibility by several steps.

use crate::types::{
    ActorId, EntityKey, EntityPayload, EventKind, HandSlot, Location, SlotView, TransientHandle,
};

/// One observable actor in the current step's roster.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSample {
    /// Stable session identity.
    pub id: ActorId,
    /// The host's per-step entity handle for this actor.
    pub handle: TransientHandle,
    /// World position this step.
    pub position: Location,
    /// What each hand slot holds; indexed by [`HandSlot::index`].
    pub slots: [SlotView; 2],
    /// `Some(slot)` when the actor is in an active "use" animation with the
    /// item in that slot.
    pub consuming: Option<HandSlot>,
}

impl ActorSample {
    /// View of a hand slot.
    #[must_use]
    pub fn slot(&self, slot: HandSlot) -> SlotView {
        self.slots[slot.index()]
    }
}

/// One currently visible tracked entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySample {
    /// Network id of the entity.
    pub key: EntityKey,
    /// Which detection path this entity belongs to.
    pub kind: EventKind,
    /// World position this step.
    pub position: Location,
    /// Classification payload, `None` while not yet replicated.
    pub payload: Option<EntityPayload>,
}

/// Everything the engine sees in one simulation step.
///
/// If the world is not loaded the observer produces no snapshot at all and
/// the engine no-ops for the step.
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    /// All actors observable this step.
    pub roster: Vec<ActorSample>,
    /// All tracked entities visible this step, newly spawned or not.
    pub entities: Vec<EntitySample>,
    /// The local viewing actor, when one exists.
    pub local_actor: Option<ActorId>,
}

impl WorldSnapshot {
    /// Whether an actor id is present in this step's roster.
    #[must_use]
    pub fn contains_actor(&self, id: ActorId) -> bool {
        self.roster.iter().any(|a| a.id == id)
    }

    /// Look up a visible tracked entity by key.
    #[must_use]
    pub fn entity(&self, key: EntityKey) -> Option<&EntitySample> {
        self.entities.iter().find(|e| e.key == key)
    }
}
