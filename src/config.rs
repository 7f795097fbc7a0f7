//! Configuration loading for the `mimir` CLI.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.mimir/config.toml` (user)
//! 3. `/etc/mimir/config.toml` (system)
//!
//! Without an implicit config file the defaults apply: settings live in
//! `~/.mimir/settings.json` under the `nanogpt_cache` key, and no
//! profiles are known.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;

use crate::gateway::{CacheDirectiveLayer, Mimir};
use crate::settings::{JsonFileBackend, MODULE_NAME, SettingsStore};
use crate::types::ConnectionProfile;
use crate::{MimirError, Result};

/// CLI configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub settings: SettingsConfig,
    /// Connection profiles by id, as the host would resolve them.
    #[serde(default)]
    pub profiles: HashMap<String, ConnectionProfile>,
}

/// Where the settings container lives.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    /// Settings container file (default: `~/.mimir/settings.json`).
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Module key inside the container (default: `nanogpt_cache`).
    #[serde(default = "default_module")]
    pub module: String,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            path: None,
            module: default_module(),
        }
    }
}

fn default_module() -> String {
    MODULE_NAME.to_string()
}

impl SettingsConfig {
    /// Resolved settings container path.
    pub fn path(&self) -> PathBuf {
        self.path.clone().unwrap_or_else(JsonFileBackend::default_path)
    }
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist; implicit locations fall back to defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let Some(path) = Self::resolve_config_path(explicit_path)? else {
            return Ok(Self::default());
        };
        let content = fs::read_to_string(&path).map_err(|e| {
            MimirError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            MimirError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path.
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(MimirError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".mimir").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/mimir/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Settings store over the configured container.
    pub fn store(&self) -> SettingsStore {
        SettingsStore::new(Arc::new(JsonFileBackend::new(self.settings.path())))
            .with_module(self.settings.module.clone())
    }

    /// Layer over the configured store and profiles.
    pub fn layer(&self) -> CacheDirectiveLayer {
        Mimir::builder()
            .settings(Arc::new(self.store()))
            .profiles(self.profiles.clone())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Decision;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.settings.module, "nanogpt_cache");
        assert_eq!(config.settings.path(), JsonFileBackend::default_path());
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [settings]
            path = "/var/lib/mimir/settings.json"
            module = "prompt_cache"

            [profiles.nano]
            model = "claude-3-5-sonnet"
            api-url = "https://nano-gpt.com/api/v1"

            [profiles.openai]
            model = "gpt-4o"
            api-url = "https://api.openai.com/v1"
            preset = "default"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.settings.path(),
            PathBuf::from("/var/lib/mimir/settings.json")
        );
        assert_eq!(config.settings.module, "prompt_cache");
        assert_eq!(config.profiles["nano"].model, "claude-3-5-sonnet");
        assert_eq!(config.profiles["openai"].api_url, "https://api.openai.com/v1");
        assert_eq!(config.profiles["openai"].extra["preset"], "default");
    }

    #[test]
    fn parse_minimal_config_keeps_defaults() {
        let config: Config = toml::from_str("[settings]\n").unwrap();
        assert_eq!(config.settings.module, "nanogpt_cache");
        assert!(config.settings.path.is_none());
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }

    #[test]
    fn layer_uses_configured_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let toml = format!(
            r#"
            [settings]
            path = "{}"

            [profiles.nano]
            model = "claude-3-opus"
            api-url = "https://nano-gpt.com/api/v1"
            "#,
            dir.path().join("settings.json").display()
        );
        let config: Config = toml::from_str(&toml).unwrap();
        let layer = config.layer();
        assert!(matches!(
            layer.decision_for("nano").unwrap(),
            Decision::Attach(_)
        ));
    }
}
