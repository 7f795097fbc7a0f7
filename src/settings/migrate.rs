//! Forward-compatible schema migration.
//!
//! Upgrades only ever add fields: a key present in the default schema but
//! absent from the persisted record is populated with its default. Existing
//! values, including ones with unexpected types, and unknown keys are never
//! touched.

use serde_json::{Map, Value};

use super::{CacheSettings, SettingKey, SettingsRecord};

/// A fresh record holding every field at its default.
///
/// Built anew on each call so the live record never aliases the defaults.
pub fn default_record() -> SettingsRecord {
    SettingsRecord::from(&CacheSettings::default())
}

/// Populate missing fields in place, returning the keys that were added.
pub fn backfill(record: &mut SettingsRecord) -> Vec<&'static str> {
    let defaults = default_record();
    let mut added = Vec::new();
    for key in SettingKey::ALL {
        let name = key.as_str();
        if record.contains_key(name) {
            continue;
        }
        if let Some(value) = defaults.get(name) {
            record.insert(name, value.clone());
            added.push(name);
        }
    }
    added
}

/// Pure migration: `old` record in, upgraded record out.
pub fn migrate(old: Map<String, Value>) -> Map<String, Value> {
    let mut record = SettingsRecord::new(old);
    backfill(&mut record);
    record.into_map()
}
