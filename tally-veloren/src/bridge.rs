//! Bridge module — maps raw host values into core types.
//!
//! Veloren identifies players by a `Uid` (u64) that is stable for the
//! session, entities by a per-connection network id, items by asset
//! definition id strings, and terrain overlays by sprite kind strings.
//! The core engine wants its own identity and item types; everything that
//! knows the host's spelling of things lives here.

use tally_core::types::{
    ActorId, BlockKind, ConsumableKind, EffectKind, EntityKey, EntityPayload, Location,
    ProjectileEffect, SlotView, TransientHandle,
};

/// Item definition id of the plain tracked consumable.
pub const PLAIN_CONSUMABLE_ID: &str = "consumable.restorative";
/// Item definition id of the empowered tracked consumable.
pub const EMPOWERED_CONSUMABLE_ID: &str = "consumable.restorative_empowered";
/// Sprite kind string of the tracked web block.
pub const WEB_SPRITE_ID: &str = "sprite.web";
/// Buff kind string of the healing projectile effect.
pub const HEAL_BUFF_ID: &str = "buff.heal";

/// Map a host session uid to a stable [`ActorId`].
///
/// The mapping is deterministic so the same player resolves to the same
/// actor every step of the session.
#[must_use]
pub fn actor_from_uid(uid: u64) -> ActorId {
    // Tag the upper half so bridged ids can never collide with randomly
    // generated ones.
    const UID_TAG: u64 = 0x7461_6c6c_795f_7569; // "tally_ui"
    ActorId(uuid::Uuid::from_u64_pair(UID_TAG, uid))
}

/// Map a host network entity id to a [`TransientHandle`].
#[must_use]
pub fn handle_from_entity(entity_id: u32) -> TransientHandle {
    TransientHandle(entity_id)
}

/// Map a host network entity id to an [`EntityKey`].
#[must_use]
pub fn key_from_entity(entity_id: u32) -> EntityKey {
    EntityKey(entity_id)
}

/// Map a host position triple to a [`Location`].
#[must_use]
pub fn location_from_parts(pos: [f32; 3]) -> Location {
    Location::new(pos[0], pos[1], pos[2])
}

/// Map a held item (definition id + stack amount) to a [`SlotView`].
///
/// `None` is an empty slot; unknown definition ids are untracked.
#[must_use]
pub fn slot_view_from_item(item_def: Option<&str>, amount: u32) -> SlotView {
    match item_def {
        None => SlotView::Empty,
        Some(PLAIN_CONSUMABLE_ID) => SlotView::Tracked {
            kind: ConsumableKind::Plain,
            count: amount,
        },
        Some(EMPOWERED_CONSUMABLE_ID) => SlotView::Tracked {
            kind: ConsumableKind::Empowered,
            count: amount,
        },
        Some(_) => SlotView::Untracked,
    }
}

/// Map a sprite kind string to a block payload.
#[must_use]
pub fn block_payload_from_sprite(sprite: &str) -> EntityPayload {
    let kind = if sprite == WEB_SPRITE_ID {
        BlockKind::Web
    } else {
        BlockKind::Other
    };
    EntityPayload::Block(kind)
}

/// Map a projectile's replicated buff data to a projectile payload.
///
/// Returns `None` while the buff component has not replicated yet — the
/// entity stays indeterminate and the engine retries it.
#[must_use]
pub fn projectile_payload_from_buff(buff: Option<(&str, u8)>) -> Option<EntityPayload> {
    buff.map(|(kind, potency)| {
        let effect = if kind == HEAL_BUFF_ID {
            EffectKind::Heal
        } else {
            EffectKind::Other
        };
        EntityPayload::Projectile(ProjectileEffect { effect, potency })
    })
}
