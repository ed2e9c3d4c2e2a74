//! Counters for cache effectiveness and upstream calls.
//!
//! Uses the `metrics` facade; nothing is exported unless the embedding
//! application installs a recorder.

use metrics::{counter, histogram};

use crate::cache::Namespace;

/// Record a cache hit.
pub fn record_cache_hit(namespace: Namespace) {
    counter!("cache_hits_total", "namespace" => namespace.as_str()).increment(1);
}

/// Record a cache miss.
pub fn record_cache_miss(namespace: Namespace) {
    counter!("cache_misses_total", "namespace" => namespace.as_str()).increment(1);
}

/// Record one upstream call.
pub fn record_upstream_call(endpoint: &'static str, success: bool, duration_ms: u64) {
    counter!("upstream_calls_total", "endpoint" => endpoint, "success" => success.to_string())
        .increment(1);
    histogram!("upstream_call_duration_ms", "endpoint" => endpoint).record(duration_ms as f64);
}
