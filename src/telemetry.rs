//! Telemetry metric name constants.
//!
//! Centralised metric names for eldhrimnir operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `eldhrimnir_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `provider`: upstream name (e.g. "chat", "spoonacular")
//! - `operation`: call made (e.g. "complete", "search_by_dish")
//! - `status`: outcome: "ok" or "error"
//! - `cache`: cache instance name ("recipes" | "translations")

/// Total upstream requests issued.
///
/// Labels: `provider`, `operation`, `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "eldhrimnir_upstream_requests_total";

/// Upstream request duration in seconds.
///
/// Labels: `provider`, `operation`.
pub const UPSTREAM_DURATION_SECONDS: &str = "eldhrimnir_upstream_duration_seconds";

/// Total cache hits.
///
/// Labels: `cache`.
pub const CACHE_HITS_TOTAL: &str = "eldhrimnir_cache_hits_total";

/// Total cache misses (absent or expired).
///
/// Labels: `cache`.
pub const CACHE_MISSES_TOTAL: &str = "eldhrimnir_cache_misses_total";

/// Total entries removed by sweeps.
///
/// Labels: `cache`.
pub const CACHE_SWEPT_TOTAL: &str = "eldhrimnir_cache_swept_total";

/// Total name resolutions, by the cascade stage that produced the term.
///
/// Labels: `stage` ("identity" | "static" | "cache" | "generative" |
/// "keyword" | "unresolved").
pub const RESOLUTIONS_TOTAL: &str = "eldhrimnir_resolutions_total";

/// Total orchestrated requests, by joint outcome.
///
/// Labels: `outcome` ("both" | "analysis_only" | "search_only" | "none").
pub const ANSWERS_TOTAL: &str = "eldhrimnir_answers_total";
