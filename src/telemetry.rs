//! Telemetry metric name constants.
//!
//! Consumers install their own `metrics` recorder (e.g. prometheus,
//! statsd); without a recorder installed, all metric calls are no-ops.
//!
//! All metrics are prefixed with `lst_advisor_`. Counters end in `_total`,
//! histograms use meaningful units (e.g. `_seconds`).
//!
//! # Common labels
//!
//! - `source`: which path produced the answer: "llm" or "fallback"
//! - `mode`: analysis mode: "Technical", "Comprehensive", "Simple"
//! - `reason`: why an answer fell back (see [`ErrorKind`](crate::error::ErrorKind))

/// Answers returned by `answer()` (cache hits excluded).
///
/// Labels: `source`, `mode`.
pub const REQUESTS_TOTAL: &str = "lst_advisor_requests_total";

/// Time to produce an answer, in seconds (cache hits excluded).
///
/// Labels: `source`.
pub const REQUEST_DURATION_SECONDS: &str = "lst_advisor_request_duration_seconds";

/// Completion attempts beyond the first.
pub const RETRIES_TOTAL: &str = "lst_advisor_retries_total";

/// Answers served by the fallback generator.
///
/// Labels: `reason`.
pub const FALLBACKS_TOTAL: &str = "lst_advisor_fallbacks_total";

/// Tokens reported by the completion service.
pub const TOKENS_TOTAL: &str = "lst_advisor_tokens_total";

/// Response cache hits.
pub const CACHE_HITS_TOTAL: &str = "lst_advisor_cache_hits_total";

/// Response cache misses.
pub const CACHE_MISSES_TOTAL: &str = "lst_advisor_cache_misses_total";

/// Late completions written to the cache after the request budget ran out.
pub const LATE_COMPLETIONS_TOTAL: &str = "lst_advisor_late_completions_total";
