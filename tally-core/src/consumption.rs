//! Per-actor consumption state machine.
//!
//! Converts a per-step stream of "is this actor actively consuming" +
//! "how many units remain" samples into discrete consumption-completed
//! events. Sampling is lossy: a stack can drop by more than one unit
//! between samples, or change identity entirely, and the "stopped using"
//! notification can arrive a few steps before the inventory sync that
//! proves the unit was actually consumed. The machine covers all of that
//! with an idle-stack baseline, a catch-up emit on the consuming edge, and
//! a bounded grace period on the stopping edge.

use std::collections::HashMap;

use tracing::trace;

use crate::config::{CountingConfig, TuningConfig};
use crate::snapshot::ActorSample;
use crate::types::{ActorId, ConsumableKind, HandSlot, SlotView};

/// The two FSM states. Baseline / slot / grace only exist while consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Consuming {
        /// Unit count last seen in the consuming slot.
        baseline: u32,
        /// Which slot the consumable is in.
        slot: HandSlot,
        /// Steps spent waiting for the inventory sync after the "using"
        /// flag dropped.
        grace: u32,
    },
}

/// Tracked-item stack observed while the actor was *not* consuming.
///
/// This is the baseline the next idle→consuming transition compares
/// against: if it is higher than the count at that transition, the missing
/// units were consumed between samples and are emitted as catch-up events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct IdleStack {
    slot: HandSlot,
    count: u32,
}

/// Per-actor consumption tracking across the whole roster.
#[derive(Debug, Default)]
pub struct ConsumptionTracker {
    states: HashMap<ActorId, Phase>,
    idle: HashMap<ActorId, IdleStack>,
}

/// Stack count in a slot view, filtered by the config's sub-kind toggles.
/// A tracked stack of a disabled sub-kind reads as untracked.
fn counted_stack(view: SlotView, counting: &CountingConfig) -> Option<u32> {
    match view {
        SlotView::Tracked { kind, count } => {
            let enabled = match kind {
                ConsumableKind::Plain => counting.count_plain_consumable,
                ConsumableKind::Empowered => counting.count_empowered_consumable,
            };
            enabled.then_some(count)
        }
        SlotView::Empty | SlotView::Untracked => None,
    }
}

/// Events to emit when a consuming slot is abandoned without a grace wait:
/// a visible decrease is one completed unit, a stack that vanished counts
/// only when its last unit was the one in use, an unchanged stack was a
/// false start.
fn settled_units(view: SlotView, baseline: u32, counting: &CountingConfig) -> u32 {
    match counted_stack(view, counting) {
        Some(current) if current < baseline => 1,
        Some(_) => 0,
        None => u32::from(baseline == 1 || view == SlotView::Empty),
    }
}

impl ConsumptionTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one actor's sample for this step. Returns the number of
    /// consumption-completed events to credit to the actor.
    pub fn observe(
        &mut self,
        actor: &ActorSample,
        counting: &CountingConfig,
        tuning: &TuningConfig,
    ) -> u32 {
        // Actively consuming only counts when the active slot holds a
        // stack we are configured to track.
        let consuming_slot = actor
            .consuming
            .filter(|&slot| counted_stack(actor.slot(slot), counting).is_some());

        let phase = self.states.entry(actor.id).or_insert(Phase::Idle);
        let mut emitted = 0u32;

        match (*phase, consuming_slot) {
            (Phase::Idle, Some(slot)) => {
                // Idle → consuming. The stack may have already decremented
                // by the time the "using" flag goes true, so the idle
                // snapshot for the same slot is the true baseline: any
                // missing units were full consumptions we never saw.
                let current = counted_stack(actor.slot(slot), counting).unwrap_or(0);
                if let Some(idle) = self.idle.get(&actor.id) {
                    if idle.slot == slot && idle.count > current {
                        emitted += idle.count - current;
                    }
                }
                trace!(actor = %actor.id, baseline = current, "consumption started");
                *phase = Phase::Consuming {
                    baseline: current,
                    slot,
                    grace: 0,
                };
            }

            (
                Phase::Consuming {
                    baseline,
                    slot,
                    grace,
                },
                Some(active_slot),
            ) => {
                if active_slot == slot {
                    // Consuming self-loop: one observed decrease = one
                    // consumption, even if the sampled decrease was larger.
                    let current = counted_stack(actor.slot(slot), counting).unwrap_or(0);
                    if current < baseline {
                        emitted += 1;
                        *phase = Phase::Consuming {
                            baseline: current,
                            slot,
                            grace,
                        };
                    }
                } else {
                    // Hand switch mid-use. The old slot's baseline says
                    // nothing about the new slot's stack, so settle the old
                    // slot first and open a fresh phase on the new one.
                    emitted += settled_units(actor.slot(slot), baseline, counting);
                    let current = counted_stack(actor.slot(active_slot), counting).unwrap_or(0);
                    trace!(actor = %actor.id, baseline = current, "consumption switched hands");
                    *phase = Phase::Consuming {
                        baseline: current,
                        slot: active_slot,
                        grace: 0,
                    };
                }
            }

            (Phase::Idle, None) => {}

            (
                Phase::Consuming {
                    baseline,
                    slot,
                    grace,
                },
                None,
            ) => {
                // The "using" flag dropped. The item-swap notification and
                // the inventory sync can arrive in either order, so this
                // resolves three ways.
                match actor.slot(slot) {
                    view if counted_stack(view, counting).is_some() => {
                        let current = counted_stack(view, counting).unwrap_or(0);
                        if current < baseline {
                            // Inventory sync landed: exactly one more unit gone.
                            emitted += 1;
                            trace!(actor = %actor.id, "consumption finished");
                            *phase = Phase::Idle;
                        } else {
                            // Slot unchanged. Hold the transition open for a
                            // bounded number of steps; past the budget it was
                            // a false start.
                            let grace = grace + 1;
                            if grace > tuning.grace_ticks {
                                trace!(actor = %actor.id, "consumption cancelled");
                                *phase = Phase::Idle;
                            } else {
                                *phase = Phase::Consuming {
                                    baseline,
                                    slot,
                                    grace,
                                };
                            }
                        }
                    }
                    view => {
                        // Slot no longer holds a tracked stack: either the
                        // last unit was consumed (baseline 1, or the slot
                        // reads empty) or the actor swapped away mid-use.
                        if baseline == 1 || view == SlotView::Empty {
                            emitted += 1;
                            trace!(actor = %actor.id, "consumption finished (stack emptied)");
                        }
                        *phase = Phase::Idle;
                    }
                }
            }
        }

        // Whenever the actor is not consuming this step, refresh the idle
        // snapshot for the next idle→consuming edge (main hand wins).
        if consuming_slot.is_none() {
            let snapshot = HandSlot::ALL.into_iter().find_map(|slot| {
                counted_stack(actor.slot(slot), counting).map(|count| IdleStack { slot, count })
            });
            match snapshot {
                Some(idle) => {
                    self.idle.insert(actor.id, idle);
                }
                None => {
                    self.idle.remove(&actor.id);
                }
            }
        }

        emitted
    }

    /// Prune per-actor state to the currently-observable roster.
    pub fn retain(&mut self, mut present: impl FnMut(ActorId) -> bool) {
        self.states.retain(|id, _| present(*id));
        self.idle.retain(|id, _| present(*id));
    }

    /// Number of actors with any tracked state.
    #[must_use]
    pub fn tracked_actors(&self) -> usize {
        self.states.len()
    }

    /// Drop all per-actor state.
    pub fn clear(&mut self) {
        self.states.clear();
        self.idle.clear();
    }
}
