//! Decorator that attaches the cache directive before forwarding.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::RequestSender;
use crate::policy::{self, Decision};
use crate::settings::SettingsStore;
use crate::telemetry;
use crate::types::{OverridePayload, ProfileRegistry, SendRequest, merge_directive};

/// Wraps a [`RequestSender`], attaching `cache_control` to the override
/// payload when the policy says so.
///
/// Settings are read once per request. Any failure while deciding is logged
/// and the request goes out exactly as the caller built it; the inner
/// sender's result is always returned unchanged.
pub struct CachingSender<S> {
    inner: S,
    settings: Arc<SettingsStore>,
    profiles: Arc<dyn ProfileRegistry>,
}

impl<S: RequestSender> CachingSender<S> {
    pub(crate) fn new(
        inner: S,
        settings: Arc<SettingsStore>,
        profiles: Arc<dyn ProfileRegistry>,
    ) -> Self {
        Self {
            inner,
            settings,
            profiles,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// The override payload that will be forwarded for `profile_id`.
    pub fn prepare(&self, profile_id: &str, payload: OverridePayload) -> OverridePayload {
        if self.inner.applies_cache_directive() {
            return payload;
        }

        let record = self.settings.load();
        let profile = self.profiles.resolve(profile_id);

        match policy::evaluate_record(&record, &profile) {
            Ok(Decision::Attach(fragment)) => {
                debug!(
                    profile_id,
                    model = %profile.model,
                    ttl = %fragment.cache_control.ttl,
                    "attaching cache_control"
                );
                metrics::counter!(telemetry::DIRECTIVES_ATTACHED_TOTAL).increment(1);
                merge_directive(payload, &fragment)
            }
            Ok(Decision::Skip(reason)) => {
                debug!(profile_id, model = %profile.model, %reason, "cache_control not attached");
                metrics::counter!(telemetry::DIRECTIVES_SKIPPED_TOTAL, "reason" => reason.as_str())
                    .increment(1);
                payload
            }
            Err(e) => {
                metrics::counter!(telemetry::POLICY_ERRORS_TOTAL).increment(1);
                warn!(profile_id, error = %e, "failed to prepare override payload");
                payload
            }
        }
    }
}

#[async_trait]
impl<S: RequestSender> RequestSender for CachingSender<S> {
    type Response = S::Response;
    type Error = S::Error;

    async fn send_request(
        &self,
        mut request: SendRequest,
    ) -> std::result::Result<Self::Response, Self::Error> {
        let payload = std::mem::take(&mut request.override_payload);
        request.override_payload = self.prepare(&request.profile_id, payload);
        self.inner.send_request(request).await
    }

    fn applies_cache_directive(&self) -> bool {
        true
    }
}
