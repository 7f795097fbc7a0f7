//! Builder for configuring the cache directive layer

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{info, warn};

use super::{CachingSender, RequestSender};
use crate::policy::{self, Decision};
use crate::settings::{SettingsBackend, SettingsStore};
use crate::types::{ConnectionProfile, ProfileRegistry};
use crate::{MimirError, Result};

/// Main entry point for creating cache directive layers.
pub struct Mimir;

impl Mimir {
    /// Create a new builder for configuring the layer.
    pub fn builder() -> MimirBuilder {
        MimirBuilder::new()
    }
}

/// Builder for configuring a [`CacheDirectiveLayer`].
#[derive(Default)]
pub struct MimirBuilder {
    settings: Option<Arc<SettingsStore>>,
    profiles: Option<Arc<dyn ProfileRegistry>>,
}

impl MimirBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing settings store (shared with a settings editor, say).
    pub fn settings(mut self, store: Arc<SettingsStore>) -> Self {
        self.settings = Some(store);
        self
    }

    /// Persist settings through the host's settings facility.
    pub fn settings_backend(mut self, backend: Arc<dyn SettingsBackend>) -> Self {
        self.settings = Some(Arc::new(SettingsStore::new(backend)));
        self
    }

    /// Host profile registry used to resolve profile ids.
    pub fn profiles(mut self, profiles: impl ProfileRegistry + 'static) -> Self {
        self.profiles = Some(Arc::new(profiles));
        self
    }

    /// Share a profile registry the host keeps updating.
    pub fn shared_profiles(mut self, profiles: Arc<dyn ProfileRegistry>) -> Self {
        self.profiles = Some(profiles);
        self
    }

    /// Build the layer.
    ///
    /// Without a settings store the layer runs on ephemeral defaults; without
    /// a profile registry every profile resolves empty.
    pub fn build(self) -> CacheDirectiveLayer {
        CacheDirectiveLayer {
            settings: self
                .settings
                .unwrap_or_else(|| Arc::new(SettingsStore::ephemeral())),
            profiles: self
                .profiles
                .unwrap_or_else(|| Arc::new(HashMap::<String, ConnectionProfile>::new())),
        }
    }
}

/// Wraps request senders with the cache directive policy.
#[derive(Clone)]
pub struct CacheDirectiveLayer {
    settings: Arc<SettingsStore>,
    profiles: Arc<dyn ProfileRegistry>,
}

impl CacheDirectiveLayer {
    /// Wrap `sender`.
    pub fn wrap<S: RequestSender>(&self, sender: S) -> CachingSender<S> {
        info!(
            version = crate::version_string(),
            module = self.settings.module(),
            "cache directive layer installed"
        );
        CachingSender::new(sender, Arc::clone(&self.settings), Arc::clone(&self.profiles))
    }

    /// Wrap the host's sender if it has one.
    ///
    /// Returns `SenderUnavailable` when it does not; the host then keeps
    /// sending through its own path and the layer is a no-op.
    pub fn install<S: RequestSender>(&self, sender: Option<S>) -> Result<CachingSender<S>> {
        match sender {
            Some(sender) => Ok(self.wrap(sender)),
            None => {
                warn!("request sender not found, cache directive layer not installed");
                Err(MimirError::SenderUnavailable)
            }
        }
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }

    /// Decision the layer would make for a request on `profile_id` right now.
    pub fn decision_for(&self, profile_id: &str) -> Result<Decision> {
        let profile = self.profiles.resolve(profile_id);
        policy::evaluate_record(&self.settings.load(), &profile)
    }
}
