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
//! - `outcome` — resolution outcome: "found" or "not_found"
//! - `scope` — invalidation scope: "provider" or "all"

/// Total resolution cache hits, positive and negative.
pub const CACHE_HITS_TOTAL: &str = "mimir_cache_hits_total";

/// Total resolution cache misses (absent or expired entry).
pub const CACHE_MISSES_TOTAL: &str = "mimir_cache_misses_total";

/// Total `find_by_name` queries issued by the resolution cache.
///
/// Labels: `status` ("ok" | "error").
pub const STORE_QUERIES_TOTAL: &str = "mimir_store_queries_total";

/// Total resolutions returned to callers.
///
/// Labels: `outcome` ("found" | "not_found").
pub const RESOLUTIONS_TOTAL: &str = "mimir_resolutions_total";

/// Total invalidation calls.
///
/// Labels: `scope` ("provider" | "all").
pub const INVALIDATIONS_TOTAL: &str = "mimir_invalidations_total";
