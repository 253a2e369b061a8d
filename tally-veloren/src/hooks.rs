//! Push-style integration hooks.
//!
//! The tick snapshot alone would miss very short-lived entities — a thrown
//! projectile can despawn one to three ticks after spawning, between two
//! snapshot scans. The host's entity-spawn callback routes through here so
//! the engine sees the entity the moment the spawn packet arrives; the
//! engine's dedup keys make a hook hit and a snapshot hit for the same
//! entity count once.
//!
//! Disconnects and the reset keybind also land here.

use tally_core::engine::TallyEngine;
use tally_core::snapshot::EntitySample;
use tally_core::types::EventKind;

use crate::bridge;

/// A projectile spawn packet arrived. Buff data may not have replicated
/// yet; the engine will retry classification each tick.
pub fn on_projectile_spawned(
    engine: &mut TallyEngine,
    entity_id: u32,
    pos: [f32; 3],
    buff: Option<(&str, u8)>,
) {
    engine.notify_spawn(EntitySample {
        key: bridge::key_from_entity(entity_id),
        kind: EventKind::ProjectileRelease,
        position: bridge::location_from_parts(pos),
        payload: bridge::projectile_payload_from_buff(buff),
    });
}

/// A terrain sprite appeared. Sprite identity is known immediately, so
/// these classify on their first step.
pub fn on_sprite_placed(engine: &mut TallyEngine, entity_id: u32, pos: [f32; 3], sprite: &str) {
    engine.notify_spawn(EntitySample {
        key: bridge::key_from_entity(entity_id),
        kind: EventKind::Placement,
        position: bridge::location_from_parts(pos),
        payload: Some(bridge::block_payload_from_sprite(sprite)),
    });
}

/// The client disconnected from the observed world. All session state is
/// abandoned.
pub fn on_disconnect(engine: &mut TallyEngine) {
    engine.reset();
}

/// The reset keybind was pressed (or the menu reset action triggered).
pub fn on_reset_pressed(engine: &mut TallyEngine) {
    engine.reset();
}
