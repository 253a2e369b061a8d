//! Deferred classification queue.
//!
//! A tracked entity can become visible several steps before its
//! classification payload replicates. Entities that cannot be classified on
//! first sight wait here and are retried once per step, up to a fixed tick
//! budget. The budget bounds queue growth from entities that despawn before
//! their payload ever arrives.

use std::collections::HashMap;

use crate::types::{Classification, EntityKey, EventKind, Location, TrackedEvent};

/// One entity awaiting classification.
///
/// The position is captured at enqueue time: projectiles keep moving after
/// release, and attribution wants the point closest to the thrower.
#[derive(Debug, Clone, Copy)]
pub struct PendingClassification {
    /// Which detection path the entity belongs to.
    pub kind: EventKind,
    /// World position when first observed.
    pub position: Location,
    /// Steps spent waiting so far.
    pub ticks_waited: u32,
}

/// How one pending entry left the queue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PendingResolution {
    /// Classified positive — forward to attribution.
    Confirmed {
        /// The entity that resolved.
        key: EntityKey,
        /// The confirmed occurrence.
        event: TrackedEvent,
    },
    /// Classified negative — drop, never re-check.
    Rejected {
        /// The entity that resolved.
        key: EntityKey,
    },
    /// Retry budget exhausted without a payload — drop, never re-check.
    TimedOut {
        /// The entity that gave up.
        key: EntityKey,
    },
}

/// Queue of entities whose classification payload has not replicated yet.
#[derive(Debug, Default)]
pub struct PendingQueue {
    entries: HashMap<EntityKey, PendingClassification>,
}

impl PendingQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an entity with zero ticks waited. Returns false if the
    /// entity is already pending.
    pub fn enqueue(&mut self, key: EntityKey, kind: EventKind, position: Location) -> bool {
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(
            key,
            PendingClassification {
                kind,
                position,
                ticks_waited: 0,
            },
        );
        true
    }

    /// Whether an entity is currently pending.
    #[must_use]
    pub fn contains(&self, key: EntityKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Number of entities currently pending.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one retry pass: attempt classification for every pending entry.
    ///
    /// Indeterminate entries age by one tick and stay queued until
    /// `retry_budget` is reached, at which point they time out. Everything
    /// else leaves the queue with its resolution.
    pub fn resolve(
        &mut self,
        retry_budget: u32,
        mut classify: impl FnMut(EntityKey) -> Classification,
    ) -> Vec<PendingResolution> {
        let mut resolutions = Vec::new();
        self.entries.retain(|&key, pending| {
            match classify(key) {
                Classification::Confirmed => {
                    resolutions.push(PendingResolution::Confirmed {
                        key,
                        event: TrackedEvent {
                            kind: pending.kind,
                            position: pending.position,
                            entity: Some(key),
                        },
                    });
                    false
                }
                Classification::Rejected => {
                    resolutions.push(PendingResolution::Rejected { key });
                    false
                }
                Classification::Indeterminate => {
                    pending.ticks_waited += 1;
                    if pending.ticks_waited >= retry_budget {
                        resolutions.push(PendingResolution::TimedOut { key });
                        false
                    } else {
                        true
                    }
                }
            }
        });
        resolutions
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
