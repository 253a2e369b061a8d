//! Proximity-based actor attribution.
//!
//! There is no causal link between an event and its actor in the
//! replicated state, so the responsible actor is inferred: nearest actor
//! to the event position, provided that distance is under a per-kind
//! cutoff. A short cutoff approximates interaction reach for placements; a
//! long one accounts for projectile travel. This is a heuristic, not a
//! guarantee.

use ordered_float::OrderedFloat;

use crate::snapshot::ActorSample;
use crate::types::{ActorId, Location};

/// Select the actor credited with an event at `position`.
///
/// When `exclude_local` is set, the local actor is removed from the
/// candidate set before nearest-neighbor selection — a farther actor
/// within the cutoff can then receive credit for the local actor's own
/// action. Returns `None` when no eligible actor is within `cutoff`.
#[must_use]
pub fn attribute(
    position: Location,
    roster: &[ActorSample],
    cutoff: f32,
    exclude_local: bool,
    local_actor: Option<ActorId>,
) -> Option<ActorId> {
    roster
        .iter()
        .filter(|actor| !(exclude_local && local_actor == Some(actor.id)))
        .map(|actor| (actor.id, actor.position.distance_to(&position)))
        .filter(|&(_, dist)| dist < cutoff)
        .min_by_key(|&(_, dist)| OrderedFloat(dist))
        .map(|(id, _)| id)
}
