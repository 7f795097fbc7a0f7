//! Mimir - prompt-cache directive middleware for chat-completion requests
//!
//! Wraps a host's request-sending entry point and, per request, decides
//! whether to attach a `cache_control` directive to the override payload.
//! The decision depends on persisted settings (master switch, TTL token,
//! model and URL filters) and on the connection profile the request is
//! sent with. Nothing in this crate can fail a request: at worst the
//! directive is omitted.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use mimir::{ConnectionProfile, JsonFileBackend, Mimir, RequestSender, SendRequest};
//!
//! struct HostSender;
//!
//! #[async_trait]
//! impl RequestSender for HostSender {
//!     type Response = serde_json::Value;
//!     type Error = std::io::Error;
//!
//!     async fn send_request(&self, request: SendRequest) -> Result<Self::Response, Self::Error> {
//!         // the host performs the actual HTTP call here
//!         Ok(serde_json::Value::Object(request.override_payload))
//!     }
//! }
//!
//! # async fn run() -> Result<(), std::io::Error> {
//! let mut profiles = HashMap::new();
//! profiles.insert(
//!     "nano".to_string(),
//!     ConnectionProfile::new("claude-sonnet-4", "https://nano-gpt.com/api/v1"),
//! );
//!
//! let layer = Mimir::builder()
//!     .settings_backend(Arc::new(JsonFileBackend::new(JsonFileBackend::default_path())))
//!     .profiles(profiles)
//!     .build();
//!
//! let sender = layer.wrap(HostSender);
//! let response = sender.send_request(SendRequest::new("nano", "Hello")).await?;
//! assert_eq!(response["cache_control"]["ttl"], "5m");
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "cli")]
pub mod config;
pub mod error;
pub mod gateway;
pub mod policy;
pub mod settings;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use error::{MimirError, Result};
pub use gateway::{CacheDirectiveLayer, CachingSender, Mimir, MimirBuilder, RequestSender};
pub use policy::{Decision, SkipReason, decide, evaluate};
pub use settings::{
    CacheSettings, JsonFileBackend, MemoryBackend, SettingKey, SettingsBackend, SettingsRecord,
    SettingsStore,
};
pub use version::{BuildInfo, PKG_VERSION, version_string};

// Re-export all types
pub use types::{
    CacheControl, ConnectionProfile, DirectiveFragment, OverridePayload, ProfileRegistry,
    SendRequest, merge_directive,
};
