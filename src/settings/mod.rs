//! Persisted cache settings.
//!
//! One JSON record per module lives in the host's settings container.
//! The pieces are kept separate so each can be tested on its own:
//!
//! - [`CacheSettings`]: typed view of the record with documented defaults.
//! - [`SettingsRecord`]: the raw persisted object, including fields this
//!   version does not know about.
//! - [`migrate`]: pure, non-destructive backfill of missing fields.
//! - [`SettingsStore`]: the live record plus best-effort persistence through
//!   a [`SettingsBackend`].

mod backend;
mod migrate;
mod record;
mod store;

pub use backend::{JsonFileBackend, MemoryBackend, SettingsBackend};
pub use migrate::{backfill, default_record, migrate};
pub use record::{CacheSettings, SettingKey, SettingsRecord};
pub use store::SettingsStore;

/// Key under which the record is stored in the settings container.
pub const MODULE_NAME: &str = "nanogpt_cache";

pub const DEFAULT_ENABLED: bool = true;
pub const DEFAULT_TTL: &str = crate::types::DEFAULT_TTL;
pub const DEFAULT_ONLY_CLAUDE: bool = true;
pub const DEFAULT_ONLY_WHEN_NANOGPT: bool = false;
pub const DEFAULT_URL_SUBSTRING: &str = "nanogpt";
