//! Effect ledger - time-bounded deltas layered over persisted attributes
//!
//! Records are keyed by (entity, attribute). There is no timer: a record
//! is active while its expiry tick lies in the future, and the active delta
//! for an attribute is the delta of the active record that expires last.
//! Re-applying an effect while one is active refreshes its duration but
//! keeps the existing magnitude, so buffs never stack.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{EntityRef, Tick};

/// One row of the effects table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub entity: EntityRef,
    pub attribute: String,
    pub delta: f64,
    pub expires_at: Tick,
}

impl EffectRecord {
    pub fn is_active(&self, now: Tick) -> bool {
        self.expires_at > now
    }
}

/// What observers should be told after an application
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectOutcome {
    /// No active record existed; the value changed by `delta`
    Applied { delta: f64, expires_at: Tick },
    /// An active record existed; only its duration moved
    Refreshed { delta: f64, expires_at: Tick },
}

/// An effect whose last active record lapsed during a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiredEffect {
    pub attribute: String,
    pub delta: f64,
}

#[derive(Debug, Clone, Default)]
pub struct EffectLedger {
    records: AHashMap<EntityRef, BTreeMap<String, Vec<EffectRecord>>>,
}

impl EffectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn latest_active<'a>(records: &'a [EffectRecord], now: Tick) -> Option<&'a EffectRecord> {
        // >= so that among equal expiries the newest row wins
        let mut best: Option<&EffectRecord> = None;
        for r in records.iter().filter(|r| r.is_active(now)) {
            if best.map_or(true, |b| r.expires_at >= b.expires_at) {
                best = Some(r);
            }
        }
        best
    }

    /// Insert a record expiring `duration` ticks after `now`
    pub fn apply(
        &mut self,
        entity: EntityRef,
        attribute: &str,
        delta: f64,
        duration: Tick,
        now: Tick,
    ) -> EffectOutcome {
        let expires_at = now + duration;
        let rows = self
            .records
            .entry(entity)
            .or_default()
            .entry(attribute.to_string())
            .or_default();

        let existing = Self::latest_active(rows, now).map(|r| r.delta);
        let stored = existing.unwrap_or(delta);
        rows.push(EffectRecord {
            entity,
            attribute: attribute.to_string(),
            delta: stored,
            expires_at,
        });

        match existing {
            Some(delta) => EffectOutcome::Refreshed {
                delta,
                expires_at: Self::latest_active(rows, now)
                    .map(|r| r.expires_at)
                    .unwrap_or(expires_at),
            },
            None => EffectOutcome::Applied { delta, expires_at },
        }
    }

    /// Delta currently layered over the base value, or 0
    pub fn active_delta(&self, entity: EntityRef, attribute: &str, now: Tick) -> f64 {
        self.records
            .get(&entity)
            .and_then(|attrs| attrs.get(attribute))
            .and_then(|rows| Self::latest_active(rows, now))
            .map_or(0.0, |r| r.delta)
    }

    /// Tick at which the active effect on an attribute ends
    pub fn expires_at(&self, entity: EntityRef, attribute: &str, now: Tick) -> Option<Tick> {
        self.records
            .get(&entity)
            .and_then(|attrs| attrs.get(attribute))
            .and_then(|rows| Self::latest_active(rows, now))
            .map(|r| r.expires_at)
    }

    /// Remove every attribute whose records have all expired
    ///
    /// Attributes that still have an active record are left untouched,
    /// expired siblings included. Returned entries carry the delta that
    /// just stopped applying.
    pub fn sweep(&mut self, entity: EntityRef, now: Tick) -> Vec<ExpiredEffect> {
        let Some(attrs) = self.records.get_mut(&entity) else {
            return Vec::new();
        };

        let mut ended = Vec::new();
        attrs.retain(|attribute, rows| {
            if rows.iter().any(|r| r.is_active(now)) {
                return true;
            }
            let last = rows.iter().max_by_key(|r| r.expires_at);
            if let Some(last) = last {
                ended.push(ExpiredEffect {
                    attribute: attribute.clone(),
                    delta: last.delta,
                });
            }
            false
        });

        if attrs.is_empty() {
            self.records.remove(&entity);
        }
        ended
    }

    /// Drop every record of a destroyed entity
    pub fn purge(&mut self, entity: EntityRef) {
        self.records.remove(&entity);
    }

    pub fn record_count(&self, entity: EntityRef) -> usize {
        self.records
            .get(&entity)
            .map_or(0, |attrs| attrs.values().map(Vec::len).sum())
    }

    /// All rows, in a stable order, for snapshots
    pub fn rows(&self) -> Vec<EffectRecord> {
        let mut entities: Vec<&EntityRef> = self.records.keys().collect();
        entities.sort();
        entities
            .into_iter()
            .flat_map(|e| self.records[e].values().flatten().cloned())
            .collect()
    }

    pub fn from_rows(rows: impl IntoIterator<Item = EffectRecord>) -> Self {
        let mut ledger = Self::new();
        for row in rows {
            ledger
                .records
                .entry(row.entity)
                .or_default()
                .entry(row.attribute.clone())
                .or_default()
                .push(row);
        }
        ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::MobId;

    const MOB: EntityRef = EntityRef::Mob(MobId(1));

    #[test]
    fn test_apply_then_read() {
        let mut ledger = EffectLedger::new();
        let outcome = ledger.apply(MOB, "speed", 2.0, 10, 100);
        assert_eq!(
            outcome,
            EffectOutcome::Applied { delta: 2.0, expires_at: 110 }
        );
        assert_eq!(ledger.active_delta(MOB, "speed", 100), 2.0);
        assert_eq!(ledger.active_delta(MOB, "speed", 109), 2.0);
        assert_eq!(ledger.active_delta(MOB, "speed", 110), 0.0);
    }

    #[test]
    fn test_reapply_refreshes_duration_not_magnitude() {
        let mut ledger = EffectLedger::new();
        ledger.apply(MOB, "attack", 3.0, 10, 0);
        let outcome = ledger.apply(MOB, "attack", 50.0, 20, 5);
        assert_eq!(
            outcome,
            EffectOutcome::Refreshed { delta: 3.0, expires_at: 25 }
        );
        assert_eq!(ledger.active_delta(MOB, "attack", 15), 3.0);
        assert_eq!(ledger.active_delta(MOB, "attack", 24), 3.0);
        assert_eq!(ledger.active_delta(MOB, "attack", 25), 0.0);
    }

    #[test]
    fn test_apply_after_expiry_uses_new_delta() {
        let mut ledger = EffectLedger::new();
        ledger.apply(MOB, "defense", 1.0, 5, 0);
        let outcome = ledger.apply(MOB, "defense", 4.0, 5, 10);
        assert!(matches!(outcome, EffectOutcome::Applied { delta, .. } if delta == 4.0));
        assert_eq!(ledger.active_delta(MOB, "defense", 12), 4.0);
    }

    #[test]
    fn test_sweep_keeps_attributes_with_active_rows() {
        let mut ledger = EffectLedger::new();
        ledger.apply(MOB, "speed", 2.0, 5, 0);
        ledger.apply(MOB, "speed", 9.0, 20, 1);
        ledger.apply(MOB, "poisoned", 1.0, 5, 0);

        let ended = ledger.sweep(MOB, 10);
        assert_eq!(
            ended,
            vec![ExpiredEffect { attribute: "poisoned".into(), delta: 1.0 }]
        );
        // expired speed sibling kept because one speed row is still active
        assert_eq!(ledger.record_count(MOB), 2);
        assert_eq!(ledger.active_delta(MOB, "speed", 10), 2.0);

        let ended = ledger.sweep(MOB, 21);
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].attribute, "speed");
        assert_eq!(ledger.record_count(MOB), 0);
    }

    #[test]
    fn test_purge_and_rows_round_trip() {
        let mut ledger = EffectLedger::new();
        ledger.apply(MOB, "speed", 2.0, 5, 0);
        let copy = EffectLedger::from_rows(ledger.rows());
        assert_eq!(copy.active_delta(MOB, "speed", 1), 2.0);

        ledger.purge(MOB);
        assert_eq!(ledger.record_count(MOB), 0);
    }
}
