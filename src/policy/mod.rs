//! Cache directive policy.
//!
//! Decides, per outgoing request, whether the `cache_control` directive is
//! attached. The decision is a pure function of the current settings and the
//! resolved connection profile:
//!
//! ```text
//! enabled? ──no──► Skip(Disabled)
//!    │yes
//!    ▼
//! onlyClaude && model !~ /claude/i ──► Skip(Model)
//!    │
//!    ▼
//! onlyWhenNanoGPT && url !~ urlSubstring ──► Skip(Host)
//!    │
//!    ▼
//! Attach({ cache_control: { enabled: true, ttl: ttl || "5m" } })
//! ```
//!
//! The host check only runs when `onlyWhenNanoGPT` is set, so the default
//! configuration never blocks arbitrary compatible endpoints.

mod matching;

pub use matching::{is_target_host, is_target_model};

use std::fmt;

use crate::Result;
use crate::settings::{CacheSettings, SettingsRecord};
use crate::types::{ConnectionProfile, DirectiveFragment};

/// Outcome of evaluating the policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Attach this fragment to the override payload.
    Attach(DirectiveFragment),
    /// Forward the request unchanged.
    Skip(SkipReason),
}

impl Decision {
    pub fn fragment(&self) -> Option<&DirectiveFragment> {
        match self {
            Decision::Attach(fragment) => Some(fragment),
            Decision::Skip(_) => None,
        }
    }

    pub fn into_fragment(self) -> Option<DirectiveFragment> {
        match self {
            Decision::Attach(fragment) => Some(fragment),
            Decision::Skip(_) => None,
        }
    }
}

/// Why the policy declined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// Master switch is off.
    Disabled,
    /// `onlyClaude` is set and the model is not a Claude model.
    Model,
    /// `onlyWhenNanoGPT` is set and the API URL does not match.
    Host,
}

impl SkipReason {
    /// Metric label value.
    pub fn as_str(self) -> &'static str {
        match self {
            SkipReason::Disabled => "disabled",
            SkipReason::Model => "model",
            SkipReason::Host => "host",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Evaluate the policy against typed settings.
pub fn evaluate(settings: &CacheSettings, profile: &ConnectionProfile) -> Decision {
    if !settings.enabled {
        return Decision::Skip(SkipReason::Disabled);
    }
    if settings.only_claude && !is_target_model(&profile.model) {
        return Decision::Skip(SkipReason::Model);
    }
    if settings.only_when_nanogpt && !is_target_host(&profile.api_url, &settings.url_substring) {
        return Decision::Skip(SkipReason::Host);
    }
    Decision::Attach(DirectiveFragment::new(settings.ttl.as_str()))
}

/// The fragment to attach, if any.
pub fn decide(settings: &CacheSettings, profile: &ConnectionProfile) -> Option<DirectiveFragment> {
    evaluate(settings, profile).into_fragment()
}

/// Evaluate the policy against a raw persisted record.
///
/// Fails with `PolicyEvaluation` when the record cannot be read as typed
/// settings; callers log and forward the request without a directive.
pub fn evaluate_record(record: &SettingsRecord, profile: &ConnectionProfile) -> Result<Decision> {
    let settings = record.settings()?;
    Ok(evaluate(&settings, profile))
}
