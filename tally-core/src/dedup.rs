//! Deduplication ledger — "already handled" claims at two scopes.
//!
//! Multiple detection paths can fire for the same physical occurrence: a
//! block update can arrive both as a single update and inside a batched
//! chunk delta within one step, and a projectile stays visible across
//! several steps after it has been classified. The ledger guarantees that
//! no occurrence is applied to the counter store more than once.

use std::collections::{HashMap, HashSet};

use crate::types::{CellPos, EntityKey};

/// Key identifying one physical occurrence for per-step deduplication.
///
/// Block appearances are keyed by grid cell (every detection path reports
/// the same cell); entity-backed occurrences by their network id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimKey {
    /// A block appearance at a grid cell.
    Cell(CellPos),
    /// An entity-backed occurrence.
    Entity(EntityKey),
}

/// The resolution recorded for a lifetime-claimed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// Counted.
    Counted,
    /// Classified negative, or the retry budget expired.
    Dropped,
}

/// Two-scope claim ledger.
///
/// * The per-step set is cleared at the start of every step and guards
///   against redundant detection paths within one step.
/// * The per-entity-lifetime map sticks to an entity until it is confirmed
///   gone and guards against re-evaluating it on later steps.
#[derive(Debug, Default)]
pub struct DedupLedger {
    step: HashSet<ClaimKey>,
    lifetime: HashMap<EntityKey, ClaimOutcome>,
}

impl DedupLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new step: clear the per-step scope.
    pub fn begin_step(&mut self) {
        self.step.clear();
    }

    /// Claim a key in the per-step scope. True only on the first call for
    /// that key this step.
    pub fn try_claim_step(&mut self, key: ClaimKey) -> bool {
        self.step.insert(key)
    }

    /// Record an entity as definitively resolved for its lifetime. True
    /// only on the first call for that entity.
    pub fn try_claim_lifetime(&mut self, key: EntityKey, outcome: ClaimOutcome) -> bool {
        if self.lifetime.contains_key(&key) {
            return false;
        }
        self.lifetime.insert(key, outcome);
        true
    }

    /// Whether an entity has already been definitively resolved.
    #[must_use]
    pub fn is_resolved(&self, key: EntityKey) -> bool {
        self.lifetime.contains_key(&key)
    }

    /// Prune lifetime claims for entities that are confirmed gone.
    ///
    /// `alive` must return true for entities still visible *or* still
    /// awaiting classification — a pending entity's claim must never be
    /// reaped mid-wait.
    pub fn retain_entities(&mut self, mut alive: impl FnMut(EntityKey) -> bool) {
        self.lifetime.retain(|key, _| alive(*key));
    }

    /// Number of lifetime claims currently held.
    #[must_use]
    pub fn lifetime_len(&self) -> usize {
        self.lifetime.len()
    }

    /// Drop all claims in both scopes.
    pub fn clear(&mut self) {
        self.step.clear();
        self.lifetime.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_claim_is_first_call_wins() {
        let mut ledger = DedupLedger::new();
        ledger.begin_step();
        let key = ClaimKey::Cell(CellPos { x: 1, y: 2, z: 3 });
        assert!(ledger.try_claim_step(key));
        assert!(!ledger.try_claim_step(key));

        // New step, same cell: claimable again.
        ledger.begin_step();
        assert!(ledger.try_claim_step(key));
    }

    #[test]
    fn lifetime_claim_survives_steps() {
        let mut ledger = DedupLedger::new();
        let key = EntityKey(7);
        assert!(ledger.try_claim_lifetime(key, ClaimOutcome::Counted));
        ledger.begin_step();
        assert!(!ledger.try_claim_lifetime(key, ClaimOutcome::Dropped));
        assert!(ledger.is_resolved(key));
    }

    #[test]
    fn retain_drops_dead_entities_only() {
        let mut ledger = DedupLedger::new();
        ledger.try_claim_lifetime(EntityKey(1), ClaimOutcome::Counted);
        ledger.try_claim_lifetime(EntityKey(2), ClaimOutcome::Dropped);
        ledger.retain_entities(|key| key == EntityKey(2));
        assert!(!ledger.is_resolved(EntityKey(1)));
        assert!(ledger.is_resolved(EntityKey(2)));
    }
}
