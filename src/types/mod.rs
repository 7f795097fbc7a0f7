//! Public types for the Mimir API.

mod directive;
mod payload;
mod profile;
mod request;

pub use directive::{CacheControl, DEFAULT_TTL, DirectiveFragment};
pub use payload::{OverridePayload, merge_directive};
pub use profile::{ConnectionProfile, ProfileRegistry};
pub use request::SendRequest;
