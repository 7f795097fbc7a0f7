//! Telemetry metric name constants.
//!
//! Centralised metric names for mimir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `mimir_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `reason`: why a request went out without a directive:
//!   "disabled", "model" or "host"
//! - `field`: settings field populated from defaults during backfill

/// Requests that left with a `cache_control` directive attached.
pub const DIRECTIVES_ATTACHED_TOTAL: &str = "mimir_directives_attached_total";

/// Requests forwarded without a directive because the policy declined.
///
/// Labels: `reason` ("disabled" | "model" | "host").
pub const DIRECTIVES_SKIPPED_TOTAL: &str = "mimir_directives_skipped_total";

/// Policy evaluations that failed and were absorbed at the wrap boundary.
pub const POLICY_ERRORS_TOTAL: &str = "mimir_policy_errors_total";

/// Settings saves that failed and were swallowed.
pub const SETTINGS_SAVE_FAILURES_TOTAL: &str = "mimir_settings_save_failures_total";

/// Settings fields populated from defaults during a schema upgrade.
///
/// Labels: `field`.
pub const SETTINGS_BACKFILLED_TOTAL: &str = "mimir_settings_backfilled_total";
