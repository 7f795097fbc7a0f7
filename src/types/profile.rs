//! Connection profiles resolved by the host

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Host-managed description of the upstream endpoint for one request.
///
/// Read-only to mimir. Fields the host keeps beyond `model` and
/// `api-url` are carried in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub model: String,
    #[serde(default, rename = "api-url", alias = "api_url", alias = "apiUrl")]
    pub api_url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ConnectionProfile {
    pub fn new(model: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_url: api_url.into(),
            extra: Map::new(),
        }
    }
}

/// Point lookup of connection profiles by id.
///
/// Implemented by the host; mimir never creates or mutates profiles.
pub trait ProfileRegistry: Send + Sync {
    fn profile(&self, profile_id: &str) -> Option<ConnectionProfile>;

    /// Resolve a profile, falling back to an empty one for unknown ids.
    fn resolve(&self, profile_id: &str) -> ConnectionProfile {
        self.profile(profile_id).unwrap_or_default()
    }
}

impl ProfileRegistry for HashMap<String, ConnectionProfile> {
    fn profile(&self, profile_id: &str) -> Option<ConnectionProfile> {
        self.get(profile_id).cloned()
    }
}
