//! Override payload passed alongside a request

use serde_json::{Map, Value};

use super::DirectiveFragment;

/// Caller-supplied request-body overrides, merged over the host's base payload.
pub type OverridePayload = Map<String, Value>;

/// Shallow-merge a directive over the caller's payload.
///
/// The directive's `cache_control` replaces any caller-supplied value for
/// that key; every other key passes through untouched.
pub fn merge_directive(mut payload: OverridePayload, fragment: &DirectiveFragment) -> OverridePayload {
    payload.insert("cache_control".into(), fragment.cache_control_value());
    payload
}
