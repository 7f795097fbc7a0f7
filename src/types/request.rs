//! Arguments of one outgoing request

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::OverridePayload;

/// One call to the host's request-sending entry point.
///
/// Mirrors `sendRequest(profileId, prompt, maxTokens, customOptions, overridePayload)`.
/// Only `override_payload` is ever changed by mimir.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SendRequest {
    pub profile_id: String,
    pub prompt: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub custom_options: Map<String, Value>,
    #[serde(default)]
    pub override_payload: OverridePayload,
}

impl SendRequest {
    pub fn new(profile_id: impl Into<String>, prompt: impl Into<Value>) -> Self {
        Self {
            profile_id: profile_id.into(),
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    pub fn max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    pub fn custom_options(mut self, options: Map<String, Value>) -> Self {
        self.custom_options = options;
        self
    }

    pub fn override_payload(mut self, payload: OverridePayload) -> Self {
        self.override_payload = payload;
        self
    }
}
