//! Persistence facilities for the settings container.
//!
//! The container is a JSON object keyed by module id. Each backend reads and
//! writes one module's entry and leaves every other entry alone.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{MimirError, Result};

/// Host settings facility.
///
/// `read` returns `Ok(None)` when the module has never been saved; an `Err`
/// means the facility itself is unusable.
pub trait SettingsBackend: Send + Sync {
    fn read(&self, module: &str) -> Result<Option<Value>>;

    fn write(&self, module: &str, record: &Value) -> Result<()>;
}

// ============================================================================
// MemoryBackend
// ============================================================================

/// In-process settings container, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    container: Mutex<Map<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing container.
    pub fn with_container(container: Map<String, Value>) -> Self {
        Self {
            container: Mutex::new(container),
        }
    }

    /// Snapshot of the whole container.
    pub fn container(&self) -> Map<String, Value> {
        self.container
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SettingsBackend for MemoryBackend {
    fn read(&self, module: &str) -> Result<Option<Value>> {
        let container = self
            .container
            .lock()
            .map_err(|e| MimirError::ConfigurationUnavailable(format!("container lock: {e}")))?;
        Ok(container.get(module).cloned())
    }

    fn write(&self, module: &str, record: &Value) -> Result<()> {
        let mut container = self
            .container
            .lock()
            .map_err(|e| MimirError::Persistence(format!("container lock: {e}")))?;
        container.insert(module.to_string(), record.clone());
        Ok(())
    }
}

// ============================================================================
// JsonFileBackend
// ============================================================================

/// Settings container stored as a JSON file.
///
/// Writes go through a uniquely named tmp file in the same directory and a
/// rename, so a crash never leaves a half-written container behind.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.mimir/settings.json`, or `.mimir/settings.json` without a home dir.
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mimir")
            .join("settings.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole container. A missing file is an empty container.
    fn read_container(&self) -> Result<Map<String, Value>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no settings file yet");
                return Ok(Map::new());
            }
            Err(e) => {
                return Err(MimirError::ConfigurationUnavailable(format!(
                    "failed to read settings file {}: {e}",
                    self.path.display()
                )));
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(container)) => Ok(container),
            Ok(_) => Err(MimirError::ConfigurationUnavailable(format!(
                "settings file {} is not a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(MimirError::ConfigurationUnavailable(format!(
                "corrupt settings file {}: {e}",
                self.path.display()
            ))),
        }
    }
}

impl SettingsBackend for JsonFileBackend {
    fn read(&self, module: &str) -> Result<Option<Value>> {
        Ok(self.read_container()?.get(module).cloned())
    }

    fn write(&self, module: &str, record: &Value) -> Result<()> {
        // an unreadable container is not overwritten: other modules live there too
        let mut container = self
            .read_container()
            .map_err(|e| MimirError::Persistence(e.to_string()))?;
        container.insert(module.to_string(), record.clone());

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(|e| {
            MimirError::Persistence(format!(
                "failed to create settings dir {}: {e}",
                parent.display()
            ))
        })?;

        // each write gets its own tmp file, so concurrent saves never share one
        let json = serde_json::to_string_pretty(&Value::Object(container))?;
        let mut tmp = NamedTempFile::new_in(parent).map_err(|e| {
            MimirError::Persistence(format!(
                "failed to create tmp file in {}: {e}",
                parent.display()
            ))
        })?;
        tmp.write_all(json.as_bytes()).map_err(|e| {
            MimirError::Persistence(format!(
                "failed to write settings file {}: {e}",
                tmp.path().display()
            ))
        })?;
        tmp.persist(&self.path).map_err(|e| {
            MimirError::Persistence(format!(
                "failed to replace settings file {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        Ok(())
    }
}
