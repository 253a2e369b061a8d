//! The per-step engine: one explicit state struct driving every component.
//!
//! Exactly one `step` runs per simulation step on the host's logic thread;
//! nothing here suspends or blocks. The only state visible outside the
//! step is the [`CounterStore`], which the render thread reads through
//! [`TallyEngine::store`].
//!
//! Step order: pending classification retries → entity scan (snapshot plus
//! the push-notification inbox, both through the same dedup keys) →
//! per-actor consumption pass → roster pruning.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::attribution::attribute;
use crate::config::TallyConfig;
use crate::consumption::ConsumptionTracker;
use crate::dedup::{ClaimKey, ClaimOutcome, DedupLedger};
use crate::pending::{PendingQueue, PendingResolution};
use crate::snapshot::{EntitySample, WorldSnapshot};
use crate::store::CounterStore;
use crate::types::{
    BlockKind, CellPos, Classification, EffectKind, EntityKey, EntityPayload, EventKind,
    TrackedEvent,
};

/// What one step produced. All counters are for this step only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Consumption-completed events credited.
    pub consumptions: u32,
    /// Placement events credited.
    pub placements: u32,
    /// Projectile events credited.
    pub projectiles: u32,
    /// Confirmed events dropped because no actor was within the cutoff.
    pub attribution_misses: u32,
    /// Pending entities that exhausted the retry budget.
    pub classification_timeouts: u32,
}

/// Cumulative counters since engine creation. Diagnostics only; survives
/// session resets.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineStats {
    /// Steps processed.
    pub steps: u64,
    /// Total events credited, all kinds.
    pub events_credited: u64,
    /// Total confirmed events dropped for lack of a nearby actor.
    pub attribution_misses: u64,
    /// Total classification timeouts.
    pub classification_timeouts: u64,
}

/// The complete detection/attribution engine.
///
/// Owns every per-actor and per-entity map; there is no global state. The
/// host integration constructs one of these per session and feeds it a
/// [`WorldSnapshot`] each step.
#[derive(Debug)]
pub struct TallyEngine {
    dedup: DedupLedger,
    pending: PendingQueue,
    consumption: ConsumptionTracker,
    store: Arc<CounterStore>,
    /// Entities reported by push-style spawn hooks since the last step.
    inbox: Vec<EntitySample>,
    /// Keys the inbox delivered this step. The snapshot may not include
    /// them yet, so pruning must treat them as alive.
    inbox_keys: HashSet<EntityKey>,
    stats: EngineStats,
}

impl TallyEngine {
    /// Create an engine with empty state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dedup: DedupLedger::new(),
            pending: PendingQueue::new(),
            consumption: ConsumptionTracker::new(),
            store: Arc::new(CounterStore::new()),
            inbox: Vec::new(),
            inbox_keys: HashSet::new(),
            stats: EngineStats::default(),
        }
    }

    /// Shared handle to the counter store, for the render collaborator.
    #[must_use]
    pub fn store(&self) -> Arc<CounterStore> {
        Arc::clone(&self.store)
    }

    /// Cumulative engine statistics.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Number of entities currently awaiting classification.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Accept a push-style spawn notification from the host. Processed on
    /// the next step through the same dedup keys as the snapshot scan, so
    /// a notification and a scan hit for the same entity count once.
    pub fn notify_spawn(&mut self, sample: EntitySample) {
        self.inbox.push(sample);
    }

    /// Unconditional session reset: every per-actor and per-entity map is
    /// cleared. Invoked on disconnect and from the external reset trigger.
    pub fn reset(&mut self) {
        self.store.reset_all();
        self.consumption.clear();
        self.dedup.clear();
        self.pending.clear();
        self.inbox.clear();
        self.inbox_keys.clear();
        debug!("engine state reset");
    }

    /// Run one simulation step against the given snapshot.
    pub fn step(&mut self, snapshot: &WorldSnapshot, config: &TallyConfig) -> StepOutcome {
        self.stats.steps += 1;
        let mut outcome = StepOutcome::default();

        // The handle index and roster pruning stay live even when counting
        // is switched off, so the overlay index never goes stale.
        for actor in &snapshot.roster {
            self.store.bind_handle(actor.handle, actor.id);
        }

        if config.general.enabled {
            self.dedup.begin_step();
            self.inbox_keys = self.inbox.iter().map(|sample| sample.key).collect();
            self.resolve_pending(snapshot, config, &mut outcome);
            self.scan_entities(snapshot, config, &mut outcome);
            self.track_consumption(snapshot, config, &mut outcome);
        } else {
            self.inbox.clear();
            self.inbox_keys.clear();
        }

        self.prune(snapshot);

        self.stats.events_credited +=
            u64::from(outcome.consumptions + outcome.placements + outcome.projectiles);
        self.stats.attribution_misses += u64::from(outcome.attribution_misses);
        self.stats.classification_timeouts += u64::from(outcome.classification_timeouts);
        outcome
    }

    // -- step phases --------------------------------------------------------

    fn resolve_pending(
        &mut self,
        snapshot: &WorldSnapshot,
        config: &TallyConfig,
        outcome: &mut StepOutcome,
    ) {
        if self.pending.is_empty() {
            return;
        }
        let inbox = std::mem::take(&mut self.inbox);
        let resolutions = self.pending.resolve(config.tuning.classify_retry_ticks, |key| {
            snapshot
                .entity(key)
                .or_else(|| inbox.iter().find(|s| s.key == key))
                .map_or(Classification::Indeterminate, |sample| {
                    classify(sample, config)
                })
        });
        self.inbox = inbox;

        for resolution in resolutions {
            match resolution {
                PendingResolution::Confirmed { key, event } => {
                    if self.dedup.try_claim_lifetime(key, ClaimOutcome::Counted) {
                        self.apply_event(event, snapshot, config, outcome);
                    }
                }
                PendingResolution::Rejected { key } => {
                    self.dedup.try_claim_lifetime(key, ClaimOutcome::Dropped);
                }
                PendingResolution::TimedOut { key } => {
                    self.dedup.try_claim_lifetime(key, ClaimOutcome::Dropped);
                    outcome.classification_timeouts += 1;
                    debug!(entity = %key, "classification retry budget exhausted");
                }
            }
        }
    }

    fn scan_entities(
        &mut self,
        snapshot: &WorldSnapshot,
        config: &TallyConfig,
        outcome: &mut StepOutcome,
    ) {
        let inbox = std::mem::take(&mut self.inbox);
        for sample in snapshot.entities.iter().chain(inbox.iter()) {
            let enabled = match sample.kind {
                EventKind::Placement => config.counting.count_placements,
                EventKind::ProjectileRelease => config.counting.count_projectiles,
                EventKind::Consumption => false, // never entity-backed
            };
            if !enabled {
                continue;
            }
            if self.dedup.is_resolved(sample.key) || self.pending.contains(sample.key) {
                continue;
            }
            if !self.dedup.try_claim_step(step_key(sample)) {
                // A redundant detection path already handled this
                // occurrence within this step. The duplicate key must be
                // resolved for its lifetime too, or the next step would
                // re-evaluate it as a fresh occurrence.
                self.dedup
                    .try_claim_lifetime(sample.key, ClaimOutcome::Dropped);
                continue;
            }

            match classify(sample, config) {
                Classification::Confirmed => {
                    // Same-step fast path: payload was already replicated.
                    if self.dedup.try_claim_lifetime(sample.key, ClaimOutcome::Counted) {
                        let event = TrackedEvent {
                            kind: sample.kind,
                            position: sample.position,
                            entity: Some(sample.key),
                        };
                        self.apply_event(event, snapshot, config, outcome);
                    }
                }
                Classification::Rejected => {
                    self.dedup
                        .try_claim_lifetime(sample.key, ClaimOutcome::Dropped);
                }
                Classification::Indeterminate => {
                    self.pending
                        .enqueue(sample.key, sample.kind, sample.position);
                }
            }
        }
    }

    fn track_consumption(
        &mut self,
        snapshot: &WorldSnapshot,
        config: &TallyConfig,
        outcome: &mut StepOutcome,
    ) {
        if !config.counting.count_consumptions {
            return;
        }
        for actor in &snapshot.roster {
            // The actor performing a consumption is unambiguous, so
            // self-exclusion here simply skips tracking the local actor.
            if !config.counting.count_self && snapshot.local_actor == Some(actor.id) {
                continue;
            }
            let emitted = self
                .consumption
                .observe(actor, &config.counting, &config.tuning);
            if emitted > 0 {
                debug!(actor = %actor.id, emitted, "consumption events credited");
                for _ in 0..emitted {
                    self.store.increment(actor.id);
                }
                outcome.consumptions += emitted;
            }
        }
    }

    fn prune(&mut self, snapshot: &WorldSnapshot) {
        let roster: HashSet<_> = snapshot.roster.iter().map(|a| a.id).collect();
        self.store.retain(|id| roster.contains(&id));
        self.consumption.retain(|id| roster.contains(&id));

        // Lifetime claims stick until the entity is confirmed gone: a
        // still-pending entity's claim is never reaped mid-wait, and an
        // entity the inbox delivered this step keeps its claim until the
        // snapshot has had a chance to show it.
        let visible: HashSet<_> = snapshot.entities.iter().map(|e| e.key).collect();
        let pending = &self.pending;
        let inbox_keys = &self.inbox_keys;
        self.dedup.retain_entities(|key| {
            visible.contains(&key) || inbox_keys.contains(&key) || pending.contains(key)
        });
    }

    fn apply_event(
        &mut self,
        event: TrackedEvent,
        snapshot: &WorldSnapshot,
        config: &TallyConfig,
        outcome: &mut StepOutcome,
    ) {
        let cutoff = match event.kind {
            EventKind::Placement => config.tuning.placement_radius,
            EventKind::ProjectileRelease => config.tuning.projectile_radius,
            EventKind::Consumption => return, // credited directly, never here
        };
        match attribute(
            event.position,
            &snapshot.roster,
            cutoff,
            !config.counting.count_self,
            snapshot.local_actor,
        ) {
            Some(actor) => {
                self.store.increment(actor);
                debug!(actor = %actor, kind = %event.kind, at = %event.position, "event credited");
                match event.kind {
                    EventKind::Placement => outcome.placements += 1,
                    EventKind::ProjectileRelease => outcome.projectiles += 1,
                    EventKind::Consumption => {}
                }
            }
            None => {
                outcome.attribution_misses += 1;
                debug!(kind = %event.kind, at = %event.position, "no actor within cutoff, event dropped");
            }
        }
    }
}

impl Default for TallyEngine {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classify a tracked entity against the counting criteria.
///
/// A missing payload is indeterminate (retried up to the budget); a
/// payload that does not match is rejected for the entity's lifetime.
#[must_use]
pub fn classify(sample: &EntitySample, config: &TallyConfig) -> Classification {
    match sample.payload {
        None => Classification::Indeterminate,
        Some(EntityPayload::Block(BlockKind::Web)) => Classification::Confirmed,
        Some(EntityPayload::Block(BlockKind::Other)) => Classification::Rejected,
        Some(EntityPayload::Projectile(effect)) => {
            if effect.effect == EffectKind::Heal
                && effect.potency >= config.counting.min_projectile_potency
            {
                Classification::Confirmed
            } else {
                Classification::Rejected
            }
        }
    }
}

/// Per-step dedup key for an entity sample: placements key on their grid
/// cell (all detection paths report the same cell), everything else on the
/// entity id.
fn step_key(sample: &EntitySample) -> ClaimKey {
    match sample.kind {
        EventKind::Placement => ClaimKey::Cell(CellPos {
            x: sample.position.x.floor() as i32,
            y: sample.position.y.floor() as i32,
            z: sample.position.z.floor() as i32,
        }),
        _ => ClaimKey::Entity(sample.key),
    }
}
