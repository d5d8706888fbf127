//! Prometheus registry shared by the HTTP middleware and the per-service
//! outcome counters.

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

static REGISTRY: OnceLock<Registry> = OnceLock::new();
static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

/// Create an `IntCounterVec` and register it. A counter that is already
/// registered under the same name is not an error for the caller; the
/// freshly built (unregistered) vector is returned instead.
pub fn register_counter_vec(name: &str, help: &str, labels: &[&str]) -> IntCounterVec {
    let counter = IntCounterVec::new(Opts::new(name, help), labels)
        .expect("metric can be created");
    if let Err(e) = registry().register(Box::new(counter.clone())) {
        tracing::warn!(metric = %name, error = %e, "Counter not registered");
    }
    counter
}

pub fn http_requests_total() -> &'static IntCounterVec {
    HTTP_REQUESTS_TOTAL.get_or_init(|| {
        register_counter_vec(
            "http_requests_total",
            "Total number of HTTP requests",
            &["method", "path", "status"],
        )
    })
}

pub fn http_request_duration_seconds() -> &'static HistogramVec {
    HTTP_REQUEST_DURATION_SECONDS.get_or_init(|| {
        let histogram = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )
        .expect("metric can be created");
        if let Err(e) = registry().register(Box::new(histogram.clone())) {
            tracing::warn!(error = %e, "Histogram not registered");
        }
        histogram
    })
}

/// Register the HTTP collectors up front so `/metrics` lists them before
/// the first request.
pub fn init_metrics() {
    http_requests_total();
    http_request_duration_seconds();
}

/// Render every registered collector in the Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
