use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::debug;

use crate::messages::frontend_messages::{CabinState, StateUpdate};

/// Owns the single authoritative [`CabinState`] of a server process.
///
/// Handles clone cheaply; every clone observes the same record. All access
/// goes through [`read`](Self::read) and [`apply`](Self::apply), which
/// serialize on one internal mutex so the two fields of the record can never
/// be observed torn across concurrent writes.
#[derive(Debug, Clone, Default)]
pub struct StateStore {
    inner: Arc<Mutex<CabinState>>,
}

impl StateStore {
    /// Fresh store holding the default record (60.0 dB / 60.0 km/h)
    pub fn new() -> Self {
        Self::default()
    }

    /// Current record, verbatim. Never fails.
    pub fn read(&self) -> CabinState {
        // A poisoned lock still holds a coherent two-field record
        *self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Apply a partial update and return the post-write record.
    ///
    /// Each present field is coerced to a float; fields that fail coercion
    /// are dropped without touching the old value. Both replacements land
    /// under a single lock acquisition, so a concurrent [`read`](Self::read)
    /// sees either all of this update or none of it.
    pub fn apply(&self, update: &StateUpdate) -> CabinState {
        let mut state = self
            .inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = &update.cabin_db {
            match coerce_float(value) {
                Some(cabin_db) => state.cabin_db = cabin_db,
                None => debug!("ignoring uncoercible cabinDb value: {value}"),
            }
        }
        if let Some(value) = &update.speed_kmh {
            match coerce_float(value) {
                Some(speed_kmh) => state.speed_kmh = speed_kmh,
                None => debug!("ignoring uncoercible speedKmh value: {value}"),
            }
        }

        *state
    }
}

/// Lenient float coercion: numbers, numeric strings (surrounding whitespace
/// tolerated) and bools all coerce; everything else is dropped.
fn coerce_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn starts_with_defaults() {
        let store = StateStore::new();
        assert_eq!(store.read(), CabinState::default());
        assert_eq!(store.read().cabin_db, 60.0);
        assert_eq!(store.read().speed_kmh, 60.0);
    }

    #[test]
    fn applies_both_fields() {
        let store = StateStore::new();
        let after = store.apply(&StateUpdate::both(72.5, 120.0));
        assert_eq!(after.cabin_db, 72.5);
        assert_eq!(after.speed_kmh, 120.0);
        assert_eq!(store.read(), after);
    }

    #[test]
    fn partial_update_leaves_other_field_alone() {
        let store = StateStore::new();
        let update = StateUpdate {
            speed_kmh: Some(json!(95.0)),
            ..Default::default()
        };
        let after = store.apply(&update);
        assert_eq!(after.cabin_db, 60.0);
        assert_eq!(after.speed_kmh, 95.0);
    }

    #[test]
    fn repeated_writes_are_idempotent() {
        let store = StateStore::new();
        let update = StateUpdate {
            cabin_db: Some(json!(72.5)),
            ..Default::default()
        };
        let first = store.apply(&update);
        let second = store.apply(&update);
        assert_eq!(first, second);
        assert_eq!(second.speed_kmh, 60.0);
    }

    #[test]
    fn uncoercible_field_is_dropped_and_the_rest_applied() {
        let store = StateStore::new();
        let update = StateUpdate {
            cabin_db: Some(json!("not-a-number")),
            speed_kmh: Some(json!(80)),
        };
        let after = store.apply(&update);
        assert_eq!(after.cabin_db, 60.0);
        assert_eq!(after.speed_kmh, 80.0);
    }

    #[test]
    fn coercion_accepts_numbers_strings_and_bools() {
        assert_eq!(coerce_float(&json!(42.5)), Some(42.5));
        assert_eq!(coerce_float(&json!(7)), Some(7.0));
        assert_eq!(coerce_float(&json!("88.25")), Some(88.25));
        assert_eq!(coerce_float(&json!("  120 ")), Some(120.0));
        assert_eq!(coerce_float(&json!(true)), Some(1.0));
        assert_eq!(coerce_float(&json!(false)), Some(0.0));

        assert_eq!(coerce_float(&json!("twelve")), None);
        assert_eq!(coerce_float(&json!(null)), None);
        assert_eq!(coerce_float(&json!([60.0])), None);
        assert_eq!(coerce_float(&json!({"value": 60.0})), None);
    }

    #[test]
    fn string_values_coerce_into_the_record() {
        let store = StateStore::new();
        let update = StateUpdate {
            cabin_db: Some(json!("75.5")),
            ..Default::default()
        };
        assert_eq!(store.apply(&update).cabin_db, 75.5);
    }
}
