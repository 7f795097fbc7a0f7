//! Cache directive attached to outgoing request payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// TTL used when the configured token is empty.
pub const DEFAULT_TTL: &str = "5m";

/// The `cache_control` object sent upstream.
///
/// `ttl` is an opaque token ("5m", "1h", ...) forwarded without validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheControl {
    pub enabled: bool,
    pub ttl: String,
}

impl CacheControl {
    /// An enabled directive; an empty `ttl` falls back to [`DEFAULT_TTL`].
    pub fn enabled(ttl: impl Into<String>) -> Self {
        let ttl = ttl.into();
        Self {
            enabled: true,
            ttl: if ttl.is_empty() {
                DEFAULT_TTL.to_string()
            } else {
                ttl
            },
        }
    }
}

/// Payload fragment produced by the policy: `{ "cache_control": { ... } }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectiveFragment {
    pub cache_control: CacheControl,
}

impl DirectiveFragment {
    pub fn new(ttl: impl Into<String>) -> Self {
        Self {
            cache_control: CacheControl::enabled(ttl),
        }
    }

    /// JSON value of the `cache_control` key.
    pub fn cache_control_value(&self) -> Value {
        serde_json::json!({
            "enabled": self.cache_control.enabled,
            "ttl": self.cache_control.ttl,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_ttl_uses_default() {
        assert_eq!(CacheControl::enabled("").ttl, "5m");
    }

    #[test]
    fn ttl_passes_through_verbatim() {
        // no validation: odd tokens reach upstream as-is
        assert_eq!(CacheControl::enabled("1h").ttl, "1h");
        assert_eq!(CacheControl::enabled("forever").ttl, "forever");
    }

    #[test]
    fn fragment_serializes_to_wire_shape() {
        let fragment = DirectiveFragment::new("1h");
        let value = serde_json::to_value(&fragment).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"cache_control": {"enabled": true, "ttl": "1h"}})
        );
        assert_eq!(fragment.cache_control_value(), value["cache_control"]);
    }
}
