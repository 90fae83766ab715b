//! Local alarm store: validated CRUD over an owned collection, with JSON
//! persistence behind the `serde` feature.

use jiff::civil::DateTime;

use crate::error::AlarmError;
use crate::model::{sanitize, Alarm};

/// Current store document version.
pub const STORE_VERSION: u32 = 1;

/// An owned, ordered collection of alarms keyed by id.
///
/// The store is a plain value with no interior mutability; callers that
/// need sharing wrap it themselves. All mutations take `now` explicitly
/// so `created_at`/`updated_at` stamping stays deterministic under test.
#[derive(Debug, Clone, Default)]
pub struct AlarmStore {
    alarms: Vec<Alarm>,
}

impl AlarmStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.alarms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }

    /// Validate and add an alarm. An empty id is assigned the smallest
    /// unused numeric id. Returns the stored alarm.
    pub fn add(&mut self, mut alarm: Alarm, now: DateTime) -> Result<&Alarm, AlarmError> {
        alarm.validate()?;
        alarm.label = sanitize(&alarm.label);
        if alarm.id.is_empty() {
            alarm.id = self.allocate_id();
        } else if self.get(&alarm.id).is_some() {
            return Err(AlarmError::validation(
                "id",
                format!("alarm '{}' already exists", alarm.id),
            ));
        }
        alarm.created_at = now;
        alarm.updated_at = now;
        self.alarms.push(alarm);
        Ok(self.alarms.last().unwrap())
    }

    pub fn get(&self, id: &str) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    /// All alarms ordered by trigger time, then label.
    pub fn all(&self) -> impl Iterator<Item = &Alarm> {
        let mut sorted: Vec<&Alarm> = self.alarms.iter().collect();
        sorted.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.label.cmp(&b.label)));
        sorted.into_iter()
    }

    /// Apply an edit to an alarm, revalidate, and bump `updated_at`.
    /// The edit is discarded if the result fails validation.
    pub fn update(
        &mut self,
        id: &str,
        now: DateTime,
        edit: impl FnOnce(&mut Alarm),
    ) -> Result<&Alarm, AlarmError> {
        let pos = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AlarmError::not_found(id))?;
        let mut edited = self.alarms[pos].clone();
        edit(&mut edited);
        edited.id = id.to_string(); // id is not editable
        edited.validate()?;
        edited.label = sanitize(&edited.label);
        edited.updated_at = now;
        self.alarms[pos] = edited;
        Ok(&self.alarms[pos])
    }

    pub fn remove(&mut self, id: &str) -> Result<Alarm, AlarmError> {
        let pos = self
            .alarms
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| AlarmError::not_found(id))?;
        Ok(self.alarms.remove(pos))
    }

    /// Set the enabled flag without touching the rest of the alarm.
    pub fn toggle(&mut self, id: &str, enabled: bool, now: DateTime) -> Result<&Alarm, AlarmError> {
        self.update(id, now, |a| a.enabled = enabled)
    }

    /// Smallest positive integer id not already taken.
    fn allocate_id(&self) -> String {
        let mut n: u64 = 1;
        loop {
            let id = n.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}

#[cfg(feature = "serde")]
mod persist {
    use std::path::Path;

    use serde::{Deserialize, Serialize};

    use super::{AlarmStore, STORE_VERSION};
    use crate::error::AlarmError;
    use crate::model::Alarm;

    #[derive(Serialize, Deserialize)]
    struct StoreDocument {
        version: u32,
        alarms: Vec<Alarm>,
    }

    impl AlarmStore {
        /// Load a store from a JSON document. A missing file yields an
        /// empty store; an unrecognized version is refused.
        pub fn load(path: impl AsRef<Path>) -> Result<Self, AlarmError> {
            let path = path.as_ref();
            if !path.exists() {
                return Ok(Self::new());
            }
            let raw = std::fs::read_to_string(path)
                .map_err(|e| AlarmError::store(format!("cannot read {}: {e}", path.display())))?;
            let doc: StoreDocument = serde_json::from_str(&raw)
                .map_err(|e| AlarmError::store(format!("cannot parse {}: {e}", path.display())))?;
            if doc.version != STORE_VERSION {
                return Err(AlarmError::store(format!(
                    "unsupported store version {} in {}",
                    doc.version,
                    path.display()
                )));
            }
            Ok(Self { alarms: doc.alarms })
        }

        /// Write the store as a pretty-printed JSON document.
        pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AlarmError> {
            let path = path.as_ref();
            let doc = StoreDocument {
                version: STORE_VERSION,
                alarms: self.alarms.clone(),
            };
            let raw = serde_json::to_string_pretty(&doc)
                .map_err(|e| AlarmError::store(format!("cannot serialize store: {e}")))?;
            std::fs::write(path, raw)
                .map_err(|e| AlarmError::store(format!("cannot write {}: {e}", path.display())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Repeat;
    use jiff::civil::{Date, Time};

    fn now() -> DateTime {
        Date::new(2023, 5, 1)
            .unwrap()
            .to_datetime(Time::new(12, 0, 0, 0).unwrap())
    }

    fn alarm(label: &str, h: i8, m: i8) -> Alarm {
        Alarm::new(label, Time::new(h, m, 0, 0).unwrap(), Repeat::Daily)
    }

    #[test]
    fn test_add_assigns_ids_and_stamps() {
        let mut store = AlarmStore::new();
        let id = store.add(alarm("Wake", 7, 0), now()).unwrap().id.clone();
        assert_eq!(id, "1");
        let second = store.add(alarm("Gym", 18, 0), now()).unwrap();
        assert_eq!(second.id, "2");
        assert_eq!(second.created_at, now());
        assert_eq!(second.updated_at, now());
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = AlarmStore::new();
        let mut a = alarm("Wake", 7, 0);
        a.id = "x".to_string();
        store.add(a.clone(), now()).unwrap();
        assert!(store.add(a, now()).is_err());
    }

    #[test]
    fn test_add_rejects_invalid_alarm() {
        let mut store = AlarmStore::new();
        let mut a = alarm("", 7, 0);
        a.label = String::new();
        assert!(store.add(a, now()).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_all_sorted_by_time_then_label() {
        let mut store = AlarmStore::new();
        store.add(alarm("Lunch", 12, 30), now()).unwrap();
        store.add(alarm("Wake", 7, 0), now()).unwrap();
        store.add(alarm("Gym", 7, 0), now()).unwrap();
        let labels: Vec<_> = store.all().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Gym", "Wake", "Lunch"]);
    }

    #[test]
    fn test_update_bumps_updated_at_and_revalidates() {
        let mut store = AlarmStore::new();
        let id = store.add(alarm("Wake", 7, 0), now()).unwrap().id.clone();
        let later = now().checked_add(jiff::Span::new().hours(1)).unwrap();
        let updated = store
            .update(&id, later, |a| a.label = "Updated".to_string())
            .unwrap();
        assert_eq!(updated.label, "Updated");
        assert_eq!(updated.updated_at, later);

        // An edit that produces an invalid alarm is rejected and discarded
        let err = store.update(&id, later, |a| a.label = String::new());
        assert!(err.is_err());
        assert_eq!(store.get(&id).unwrap().label, "Updated");
    }

    #[test]
    fn test_update_unknown_id() {
        let mut store = AlarmStore::new();
        assert!(matches!(
            store.update("999", now(), |_| {}),
            Err(AlarmError::NotFound { .. })
        ));
    }

    #[test]
    fn test_remove() {
        let mut store = AlarmStore::new();
        let id = store.add(alarm("Wake", 7, 0), now()).unwrap().id.clone();
        let removed = store.remove(&id).unwrap();
        assert_eq!(removed.label, "Wake");
        assert!(store.remove(&id).is_err());
    }

    #[test]
    fn test_toggle() {
        let mut store = AlarmStore::new();
        let id = store.add(alarm("Wake", 7, 0), now()).unwrap().id.clone();
        let toggled = store.toggle(&id, false, now()).unwrap();
        assert!(!toggled.enabled);
    }

    #[test]
    fn test_add_sanitizes_label() {
        let mut store = AlarmStore::new();
        let stored = store.add(alarm("  Wake\u{0}up  ", 7, 0), now()).unwrap();
        assert_eq!(stored.label, "Wakeup");
    }
}
