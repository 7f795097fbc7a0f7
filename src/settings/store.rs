//! The live settings record and its persistence.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use super::{MODULE_NAME, SettingKey, SettingsBackend, SettingsRecord, backfill, default_record};
use crate::Result;
use crate::telemetry;

/// Owns the single live settings record for one module.
///
/// The record is materialised from the backend on first use and kept in
/// memory afterwards; every [`load()`](Self::load) backfills fields added
/// since the record was written. A store without a backend, or whose backend
/// cannot be read, runs on ephemeral defaults.
///
/// Persistence is best-effort: [`save()`](Self::save) logs and swallows
/// failures.
pub struct SettingsStore {
    module: String,
    backend: Option<Arc<dyn SettingsBackend>>,
    live: RwLock<Option<SettingsRecord>>,
}

impl SettingsStore {
    /// Store backed by `backend`, under the default module key.
    pub fn new(backend: Arc<dyn SettingsBackend>) -> Self {
        Self {
            module: MODULE_NAME.to_string(),
            backend: Some(backend),
            live: RwLock::new(None),
        }
    }

    /// Store with no persistence; edits last for the process lifetime only.
    pub fn ephemeral() -> Self {
        Self {
            module: MODULE_NAME.to_string(),
            backend: None,
            live: RwLock::new(None),
        }
    }

    /// Use a different module key in the settings container.
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    /// Current record with every schema field present.
    ///
    /// Never fails. Repeated calls without intervening writes return equal
    /// records.
    pub fn load(&self) -> SettingsRecord {
        let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
        let record = live.get_or_insert_with(|| self.read_persisted());
        for field in backfill(record) {
            debug!(module = %self.module, field, "backfilled settings field");
            metrics::counter!(telemetry::SETTINGS_BACKFILLED_TOTAL, "field" => field)
                .increment(1);
        }
        record.clone()
    }

    /// Drop the live record and re-read it from the backend.
    pub fn reload(&self) -> SettingsRecord {
        *self.live.write().unwrap_or_else(PoisonError::into_inner) = None;
        self.load()
    }

    /// Ask the backend to persist the live record.
    pub fn save(&self) {
        let Some(backend) = &self.backend else {
            debug!(module = %self.module, "ephemeral settings, nothing to save");
            return;
        };
        let record = self.load();
        if let Err(e) = backend.write(&self.module, &record.to_value()) {
            metrics::counter!(telemetry::SETTINGS_SAVE_FAILURES_TOTAL).increment(1);
            warn!(module = %self.module, error = %e, "failed to save settings");
        }
    }

    /// Mutate the live record, then save.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut SettingsRecord),
    {
        self.load();
        {
            let mut live = self.live.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(record) = live.as_mut() {
                f(record);
            }
        }
        self.save();
    }

    /// Set one field from raw user input, then save.
    ///
    /// Toggles accept boolean words; text fields are trimmed.
    pub fn set(&self, key: SettingKey, raw: &str) -> Result<()> {
        let value = key.parse_value(raw)?;
        self.update(|record| {
            record.insert(key.as_str(), value);
        });
        Ok(())
    }

    /// Replace the record with fresh defaults, then save.
    ///
    /// Unknown fields are dropped along with everything else.
    pub fn reset(&self) {
        *self.live.write().unwrap_or_else(PoisonError::into_inner) = Some(default_record());
        self.save();
    }

    fn read_persisted(&self) -> SettingsRecord {
        let Some(backend) = &self.backend else {
            return default_record();
        };
        match backend.read(&self.module) {
            Ok(Some(Value::Object(map))) => SettingsRecord::new(map),
            Ok(Some(_)) => {
                warn!(module = %self.module, "persisted settings are not an object, using defaults");
                default_record()
            }
            Ok(None) => default_record(),
            Err(e) => {
                warn!(
                    module = %self.module,
                    error = %e,
                    "settings facility unavailable, using ephemeral defaults"
                );
                default_record()
            }
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::ephemeral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MimirError;
    use crate::settings::MemoryBackend;
    use serde_json::json;

    struct UnavailableBackend;

    impl SettingsBackend for UnavailableBackend {
        fn read(&self, _module: &str) -> Result<Option<Value>> {
            Err(MimirError::ConfigurationUnavailable("no host".into()))
        }

        fn write(&self, _module: &str, _record: &Value) -> Result<()> {
            Err(MimirError::Persistence("no host".into()))
        }
    }

    #[test]
    fn ephemeral_store_loads_defaults() {
        let store = SettingsStore::ephemeral();
        assert_eq!(store.load(), default_record());
        assert!(!store.is_persistent());
    }

    #[test]
    fn load_is_idempotent() {
        let store = SettingsStore::new(Arc::new(MemoryBackend::new()));
        assert_eq!(store.load(), store.load());
    }

    #[test]
    fn unavailable_backend_degrades_to_defaults() {
        let store = SettingsStore::new(Arc::new(UnavailableBackend));
        assert_eq!(store.load(), default_record());
        // save failure is swallowed
        store.set(SettingKey::Ttl, "1h").unwrap();
        assert_eq!(store.load().get("ttl"), Some(&json!("1h")));
    }

    #[test]
    fn non_object_record_is_replaced_by_defaults() {
        let backend = MemoryBackend::new();
        backend.write(MODULE_NAME, &json!("garbage")).unwrap();
        let store = SettingsStore::new(Arc::new(backend));
        assert_eq!(store.load(), default_record());
    }

    #[test]
    fn reset_restores_defaults() {
        let store = SettingsStore::ephemeral();
        store.set(SettingKey::Enabled, "false").unwrap();
        store.reset();
        assert_eq!(store.load(), default_record());
    }

    #[test]
    fn invalid_toggle_leaves_record_untouched() {
        let store = SettingsStore::ephemeral();
        assert!(store.set(SettingKey::OnlyClaude, "sometimes").is_err());
        assert_eq!(store.load(), default_record());
    }
}
