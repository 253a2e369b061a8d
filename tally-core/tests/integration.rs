//! Integration tests — end-to-end engine scenarios.
//!
//! Each test drives a [`TallyEngine`] through whole steps with hand-built
//! snapshots and checks what lands in the counter store: dedup across
//! detection paths and steps, deferred classification, proximity
//! attribution, consumption tracking, roster pruning, and session resets.

use tally_core::config::TallyConfig;
use tally_core::engine::TallyEngine;
use tally_core::snapshot::{ActorSample, EntitySample, WorldSnapshot};
use tally_core::types::{
    ActorId, BlockKind, ConsumableKind, EffectKind, EntityKey, EntityPayload, EventKind, HandSlot,
    Location, ProjectileEffect, SlotView, TransientHandle,
};

fn actor(handle: u32, x: f32) -> ActorSample {
    ActorSample {
        id: ActorId::new(),
        handle: TransientHandle(handle),
        position: Location::new(x, 0.0, 0.0),
        slots: [SlotView::Empty, SlotView::Empty],
        consuming: None,
    }
}

fn web(key: u32, position: Location) -> EntitySample {
    EntitySample {
        key: EntityKey(key),
        kind: EventKind::Placement,
        position,
        payload: Some(EntityPayload::Block(BlockKind::Web)),
    }
}

fn heal_projectile(key: u32, position: Location) -> EntitySample {
    EntitySample {
        key: EntityKey(key),
        kind: EventKind::ProjectileRelease,
        position,
        payload: Some(EntityPayload::Projectile(ProjectileEffect {
            effect: EffectKind::Heal,
            potency: 1,
        })),
    }
}

fn snapshot(roster: Vec<ActorSample>, entities: Vec<EntitySample>) -> WorldSnapshot {
    let local_actor = roster.first().map(|a| a.id);
    WorldSnapshot {
        roster,
        entities,
        local_actor,
    }
}

// ---------------------------------------------------------------------------
// Deduplication
// ---------------------------------------------------------------------------

#[test]
fn entity_visible_across_steps_counts_once() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let placer = actor(1, 1.0);
    let world = snapshot(vec![placer], vec![web(10, Location::default())]);

    let first = engine.step(&world, &config);
    assert_eq!(first.placements, 1);

    // Same entity still visible on later steps: the lifetime claim holds.
    for _ in 0..5 {
        let outcome = engine.step(&world, &config);
        assert_eq!(outcome.placements, 0);
    }
    assert_eq!(engine.store().get(placer.id), 1);
}

#[test]
fn spawn_notification_and_snapshot_scan_count_once() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let thrower = actor(1, 2.0);
    let sample = heal_projectile(7, Location::default());

    // The push hook and the per-step scan both report the same entity
    // within one step.
    engine.notify_spawn(sample);
    let outcome = engine.step(&snapshot(vec![thrower], vec![sample]), &config);

    assert_eq!(outcome.projectiles, 1);
    assert_eq!(engine.store().get(thrower.id), 1);
}

#[test]
fn inbox_counted_entity_stays_claimed_into_the_next_snapshot() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let thrower = actor(1, 2.0);
    let sample = heal_projectile(15, Location::default());

    // The spawn hook reports the projectile before any snapshot shows it.
    engine.notify_spawn(sample);
    let outcome = engine.step(&snapshot(vec![thrower], vec![]), &config);
    assert_eq!(outcome.projectiles, 1);

    // The entity reaches the snapshot scan one step later: same throw,
    // the lifetime claim must have survived the gap.
    let outcome = engine.step(&snapshot(vec![thrower], vec![sample]), &config);
    assert_eq!(outcome.projectiles, 0);
    assert_eq!(engine.store().get(thrower.id), 1);
}

#[test]
fn placements_in_the_same_cell_count_once() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let placer = actor(1, 1.0);

    // Two detection hits with different entity keys but the same grid
    // cell, as redundant placement paths produce.
    let world = snapshot(
        vec![placer],
        vec![
            web(20, Location::new(0.2, 0.0, 0.7)),
            web(21, Location::new(0.9, 0.0, 0.1)),
        ],
    );
    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.placements, 1);

    // The duplicate key must stay resolved once the per-step scope
    // clears, not come back as a fresh occurrence.
    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.placements, 0);
    assert_eq!(engine.store().get(placer.id), 1);
}

// ---------------------------------------------------------------------------
// Deferred classification
// ---------------------------------------------------------------------------

#[test]
fn late_payload_confirms_at_spawn_position() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let thrower = actor(1, 2.0);

    // Visible with no payload: enqueued, nothing counted.
    let unclassified = EntitySample {
        payload: None,
        ..heal_projectile(30, Location::default())
    };
    let outcome = engine.step(&snapshot(vec![thrower], vec![unclassified]), &config);
    assert_eq!(outcome.projectiles, 0);
    assert_eq!(engine.pending_len(), 1);

    // Still no payload for a couple of steps while the entity moves.
    let moved = EntitySample {
        position: Location::new(30.0, 0.0, 0.0),
        ..unclassified
    };
    for _ in 0..2 {
        engine.step(&snapshot(vec![thrower], vec![moved]), &config);
    }

    // Payload replicates. Attribution must use the spawn position, which
    // is the only one near the thrower.
    let classified = EntitySample {
        position: Location::new(30.0, 0.0, 0.0),
        ..heal_projectile(30, Location::default())
    };
    let outcome = engine.step(&snapshot(vec![thrower], vec![classified]), &config);
    assert_eq!(outcome.projectiles, 1);
    assert_eq!(engine.store().get(thrower.id), 1);
    assert_eq!(engine.pending_len(), 0);
}

#[test]
fn unclassifiable_entity_times_out_after_retry_budget() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let bystander = actor(1, 2.0);
    let unclassified = EntitySample {
        payload: None,
        ..heal_projectile(40, Location::default())
    };
    let world = snapshot(vec![bystander], vec![unclassified]);

    // Discovery step enqueues; each later step is one retry.
    engine.step(&world, &config);
    for _ in 0..19 {
        let outcome = engine.step(&world, &config);
        assert_eq!(outcome.classification_timeouts, 0);
        assert_eq!(engine.pending_len(), 1);
    }
    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.classification_timeouts, 1);
    assert_eq!(engine.pending_len(), 0);

    // The timed-out entity is resolved for its lifetime: never re-queued.
    let outcome = engine.step(&world, &config);
    assert_eq!(engine.pending_len(), 0);
    assert_eq!(outcome.classification_timeouts, 0);
    assert_eq!(engine.store().get(bystander.id), 0);
}

#[test]
fn rejected_payload_is_never_counted() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let placer = actor(1, 1.0);
    let other_block = EntitySample {
        payload: Some(EntityPayload::Block(BlockKind::Other)),
        ..web(50, Location::default())
    };
    let world = snapshot(vec![placer], vec![other_block]);

    for _ in 0..3 {
        let outcome = engine.step(&world, &config);
        assert_eq!(outcome.placements, 0);
    }
    assert!(engine.store().is_empty());
}

// ---------------------------------------------------------------------------
// Proximity attribution
// ---------------------------------------------------------------------------

#[test]
fn nearest_actor_within_cutoff_gets_the_credit() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let near = actor(1, 3.0);
    let far = actor(2, 9.0);
    let world = snapshot(vec![near, far], vec![web(60, Location::default())]);

    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.placements, 1);
    assert_eq!(engine.store().get(near.id), 1);
    assert_eq!(engine.store().get(far.id), 0);
}

#[test]
fn placement_with_no_actor_within_cutoff_is_dropped() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    // Placement radius is 7.0; both candidates are outside it.
    let world = snapshot(
        vec![actor(1, 9.0), actor(2, 12.0)],
        vec![web(61, Location::default())],
    );

    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.placements, 0);
    assert_eq!(outcome.attribution_misses, 1);
    assert!(engine.store().is_empty());
}

#[test]
fn self_exclusion_drops_the_sole_local_candidate() {
    let mut config = TallyConfig::default();
    config.counting.count_self = false;
    let mut engine = TallyEngine::new();

    // The local actor (first in the roster) is the only one in range.
    let local = actor(1, 1.0);
    let world = snapshot(vec![local], vec![web(62, Location::default())]);

    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.attribution_misses, 1);
    assert_eq!(engine.store().get(local.id), 0);
}

#[test]
fn self_exclusion_shifts_credit_to_the_next_nearest() {
    let mut config = TallyConfig::default();
    config.counting.count_self = false;
    let mut engine = TallyEngine::new();

    let local = actor(1, 1.0);
    let remote = actor(2, 5.0);
    let world = snapshot(vec![local, remote], vec![web(63, Location::default())]);

    let outcome = engine.step(&world, &config);
    assert_eq!(outcome.placements, 1);
    assert_eq!(engine.store().get(remote.id), 1);
    assert_eq!(engine.store().get(local.id), 0);
}

// ---------------------------------------------------------------------------
// Consumption
// ---------------------------------------------------------------------------

fn eater(handle: u32, count: u32, consuming: bool) -> ActorSample {
    ActorSample {
        slots: [
            SlotView::Tracked {
                kind: ConsumableKind::Plain,
                count,
            },
            SlotView::Empty,
        ],
        consuming: consuming.then_some(HandSlot::Main),
        ..actor(handle, 0.0)
    }
}

#[test]
fn consumption_is_credited_through_the_store() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();

    // Idle baseline, start consuming, one unit gone.
    let mut idle = eater(1, 3, false);
    let id = idle.id;
    engine.step(&snapshot(vec![idle], vec![]), &config);
    idle.consuming = Some(HandSlot::Main);
    engine.step(&snapshot(vec![idle], vec![]), &config);
    let mut decreased = idle;
    decreased.slots[0] = SlotView::Tracked {
        kind: ConsumableKind::Plain,
        count: 2,
    };
    let outcome = engine.step(&snapshot(vec![decreased], vec![]), &config);

    assert_eq!(outcome.consumptions, 1);
    assert_eq!(engine.store().get(id), 1);
}

#[test]
fn missed_steps_are_caught_up_on_the_consuming_edge() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();

    // Idle with 5 units; next sample is already mid-consume with 3 left.
    let idle = eater(1, 5, false);
    engine.step(&snapshot(vec![idle], vec![]), &config);
    let caught_up = ActorSample {
        slots: [
            SlotView::Tracked {
                kind: ConsumableKind::Plain,
                count: 3,
            },
            SlotView::Empty,
        ],
        consuming: Some(HandSlot::Main),
        ..idle
    };
    let outcome = engine.step(&snapshot(vec![caught_up], vec![]), &config);

    assert_eq!(outcome.consumptions, 2);
    assert_eq!(engine.store().get(idle.id), 2);
}

#[test]
fn grace_flicker_does_not_double_count() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();

    let consuming = eater(1, 2, true);
    let flicker = ActorSample {
        consuming: None,
        ..consuming
    };

    engine.step(&snapshot(vec![flicker], vec![]), &config);
    engine.step(&snapshot(vec![consuming], vec![]), &config);

    // The "using" flag flickers off for a few steps within the grace
    // budget, then the decrease lands.
    let mut total = 0;
    for _ in 0..3 {
        total += engine.step(&snapshot(vec![flicker], vec![]), &config).consumptions;
    }
    let finished = ActorSample {
        slots: [
            SlotView::Tracked {
                kind: ConsumableKind::Plain,
                count: 1,
            },
            SlotView::Empty,
        ],
        ..flicker
    };
    total += engine.step(&snapshot(vec![finished], vec![]), &config).consumptions;

    assert_eq!(total, 1);
    assert_eq!(engine.store().get(consuming.id), 1);
}

// ---------------------------------------------------------------------------
// Pruning, resets, and the master toggle
// ---------------------------------------------------------------------------

#[test]
fn departed_actor_loses_its_tally() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let placer = actor(1, 1.0);

    engine.step(
        &snapshot(vec![placer], vec![web(70, Location::default())]),
        &config,
    );
    assert_eq!(engine.store().get(placer.id), 1);

    // Next step the actor is out of observation range.
    engine.step(&snapshot(vec![], vec![]), &config);
    assert_eq!(engine.store().get(placer.id), 0);
    assert!(engine.store().is_empty());
}

#[test]
fn reset_clears_counts_and_pending_work() {
    let config = TallyConfig::default();
    let mut engine = TallyEngine::new();
    let placer = actor(1, 1.0);
    let unclassified = EntitySample {
        payload: None,
        ..heal_projectile(80, Location::default())
    };

    engine.step(
        &snapshot(vec![placer], vec![web(81, Location::default()), unclassified]),
        &config,
    );
    assert_eq!(engine.store().get(placer.id), 1);
    assert_eq!(engine.pending_len(), 1);

    engine.reset();
    assert!(engine.store().is_empty());
    assert_eq!(engine.pending_len(), 0);
}

#[test]
fn disabled_engine_still_indexes_handles_but_counts_nothing() {
    let mut config = TallyConfig::default();
    config.general.enabled = false;
    let mut engine = TallyEngine::new();
    let placer = actor(1, 1.0);

    let outcome = engine.step(
        &snapshot(vec![placer], vec![web(90, Location::default())]),
        &config,
    );
    assert_eq!(outcome, tally_core::StepOutcome::default());
    assert!(engine.store().is_empty());
    // The overlay's handle index stays fresh while counting is off.
    assert_eq!(
        engine.store().actor_for_handle(placer.handle),
        Some(placer.id)
    );
}

#[test]
fn kind_toggle_ignores_that_detection_path_only() {
    let mut config = TallyConfig::default();
    config.counting.count_placements = false;
    let mut engine = TallyEngine::new();
    let nearby = actor(1, 2.0);

    let world = snapshot(
        vec![nearby],
        vec![
            web(100, Location::default()),
            heal_projectile(101, Location::new(0.0, 0.0, 1.0)),
        ],
    );
    let outcome = engine.step(&world, &config);

    assert_eq!(outcome.placements, 0);
    assert_eq!(outcome.projectiles, 1);
    assert_eq!(engine.store().get(nearby.id), 1);
}
