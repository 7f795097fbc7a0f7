//! The host's request-sending seam

use std::sync::Arc;

use async_trait::async_trait;

use crate::types::SendRequest;

/// A host entry point that performs the actual chat-completion request.
///
/// The response and error types belong to the host; mimir returns them
/// unchanged.
#[async_trait]
pub trait RequestSender: Send + Sync {
    type Response: Send;
    type Error: Send;

    async fn send_request(
        &self,
        request: SendRequest,
    ) -> std::result::Result<Self::Response, Self::Error>;

    /// Whether this sender already attaches the cache directive.
    ///
    /// A [`CachingSender`](super::CachingSender) wrapping a sender that
    /// returns true forwards requests untouched, so wrapping twice behaves
    /// like wrapping once.
    fn applies_cache_directive(&self) -> bool {
        false
    }
}

#[async_trait]
impl<S> RequestSender for Arc<S>
where
    S: RequestSender + ?Sized,
{
    type Response = S::Response;
    type Error = S::Error;

    async fn send_request(
        &self,
        request: SendRequest,
    ) -> std::result::Result<Self::Response, Self::Error> {
        self.as_ref().send_request(request).await
    }

    fn applies_cache_directive(&self) -> bool {
        self.as_ref().applies_cache_directive()
    }
}
