//! Request-sender wrapping.
//!
//! The host hands its request-sending entry point to a
//! [`CacheDirectiveLayer`] and gets back a [`CachingSender`] with the same
//! signature. Composition is explicit: nothing global is patched.

mod builder;
mod interceptor;
mod sender;

pub use builder::{CacheDirectiveLayer, Mimir, MimirBuilder};
pub use interceptor::CachingSender;
pub use sender::RequestSender;
