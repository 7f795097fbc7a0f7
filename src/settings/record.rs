//! Settings record types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{
    DEFAULT_ENABLED, DEFAULT_ONLY_CLAUDE, DEFAULT_ONLY_WHEN_NANOGPT, DEFAULT_TTL,
    DEFAULT_URL_SUBSTRING,
};
use crate::{MimirError, Result};

/// Typed view of the persisted settings.
///
/// Unknown keys (UI state such as chip position, fields from newer
/// versions) are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Master switch; when false no directive is ever attached.
    pub enabled: bool,
    /// Cache lifetime token forwarded verbatim ("5m", "1h").
    #[serde(deserialize_with = "null_as_empty")]
    pub ttl: String,
    /// Only attach for models whose id contains "claude" (case-insensitive).
    #[serde(rename = "onlyClaude")]
    pub only_claude: bool,
    /// Only attach when the API URL matches `url_substring`.
    #[serde(rename = "onlyWhenNanoGPT")]
    pub only_when_nanogpt: bool,
    /// Hostname or URL fragment checked when `only_when_nanogpt` is set.
    #[serde(rename = "urlSubstring", deserialize_with = "null_as_empty")]
    pub url_substring: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A persisted `null` text field reads as empty, so the usual empty-value
/// fallbacks apply. Any other non-string value is still rejected.
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLED,
            ttl: DEFAULT_TTL.to_string(),
            only_claude: DEFAULT_ONLY_CLAUDE,
            only_when_nanogpt: DEFAULT_ONLY_WHEN_NANOGPT,
            url_substring: DEFAULT_URL_SUBSTRING.to_string(),
            extra: Map::new(),
        }
    }
}

impl CacheSettings {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn ttl(mut self, ttl: impl Into<String>) -> Self {
        self.ttl = ttl.into();
        self
    }

    pub fn only_claude(mut self, only: bool) -> Self {
        self.only_claude = only;
        self
    }

    pub fn only_when_nanogpt(mut self, only: bool) -> Self {
        self.only_when_nanogpt = only;
        self
    }

    pub fn url_substring(mut self, substring: impl Into<String>) -> Self {
        self.url_substring = substring.into();
        self
    }
}

impl TryFrom<&SettingsRecord> for CacheSettings {
    type Error = MimirError;

    fn try_from(record: &SettingsRecord) -> std::result::Result<Self, Self::Error> {
        serde_json::from_value(Value::Object(record.as_map().clone()))
            .map_err(|e| MimirError::PolicyEvaluation(format!("malformed settings record: {e}")))
    }
}

/// The raw persisted settings object.
///
/// Held as JSON so that fields this version does not recognise survive a
/// load/save cycle, and so that a record with wrong field types can still
/// be loaded (it fails later, at evaluation).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SettingsRecord(Map<String, Value>);

impl SettingsRecord {
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Typed view of this record.
    pub fn settings(&self) -> Result<CacheSettings> {
        CacheSettings::try_from(self)
    }
}

impl From<Map<String, Value>> for SettingsRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<&CacheSettings> for SettingsRecord {
    fn from(settings: &CacheSettings) -> Self {
        let mut map = settings.extra.clone();
        map.insert("enabled".into(), Value::Bool(settings.enabled));
        map.insert("ttl".into(), Value::String(settings.ttl.clone()));
        map.insert("onlyClaude".into(), Value::Bool(settings.only_claude));
        map.insert(
            "onlyWhenNanoGPT".into(),
            Value::Bool(settings.only_when_nanogpt),
        );
        map.insert(
            "urlSubstring".into(),
            Value::String(settings.url_substring.clone()),
        );
        Self(map)
    }
}

/// A user-editable settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Enabled,
    Ttl,
    OnlyClaude,
    OnlyWhenNanoGpt,
    UrlSubstring,
}

impl SettingKey {
    pub const ALL: [SettingKey; 5] = [
        SettingKey::Enabled,
        SettingKey::Ttl,
        SettingKey::OnlyClaude,
        SettingKey::OnlyWhenNanoGpt,
        SettingKey::UrlSubstring,
    ];

    /// Field name in the persisted record.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Enabled => "enabled",
            SettingKey::Ttl => "ttl",
            SettingKey::OnlyClaude => "onlyClaude",
            SettingKey::OnlyWhenNanoGpt => "onlyWhenNanoGPT",
            SettingKey::UrlSubstring => "urlSubstring",
        }
    }

    /// Toggles take booleans; the rest take trimmed text.
    pub fn is_toggle(self) -> bool {
        matches!(
            self,
            SettingKey::Enabled | SettingKey::OnlyClaude | SettingKey::OnlyWhenNanoGpt
        )
    }

    /// Convert raw user input into the value stored for this field.
    pub fn parse_value(self, raw: &str) -> Result<Value> {
        let raw = raw.trim();
        if !self.is_toggle() {
            return Ok(Value::String(raw.to_string()));
        }
        match raw.to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Ok(Value::Bool(true)),
            "false" | "off" | "no" | "0" => Ok(Value::Bool(false)),
            other => Err(MimirError::InvalidInput(format!(
                "'{other}' is not a boolean value for {}",
                self.as_str()
            ))),
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = MimirError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        SettingKey::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| MimirError::UnknownSetting(s.to_string()))
    }
}
