//! # Prometheus Metrics
//!
//! HTTP-level metrics (request counts, latency, errors) are recorded in
//! middleware. Registry gauges (records by status, active sessions) are
//! updated on each `/metrics` scrape (pull model) — see the metrics
//! handler in `lib.rs`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use axum::Extension;
use prometheus::{
    Encoder, Gauge, GaugeVec, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Shared metrics state backed by a Prometheus registry.
#[derive(Clone)]
pub struct ApiMetrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,

    // -- HTTP middleware metrics (push model) --
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    http_errors_total: IntCounterVec,

    // -- Registry gauges (pull model, updated on /metrics scrape) --
    records_total: GaugeVec,
    sessions_active: Gauge,
}

impl std::fmt::Debug for ApiMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiMetrics").finish_non_exhaustive()
    }
}

impl ApiMetrics {
    /// Create a new metrics instance with a fresh Prometheus registry.
    pub fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("lmd_http_requests_total", "Total HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "lmd_http_request_duration_seconds",
                "HTTP request duration in seconds",
            )
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]),
            &["method", "path"],
        )
        .expect("metric can be created");

        let http_errors_total = IntCounterVec::new(
            Opts::new("lmd_http_errors_total", "Total HTTP errors (4xx and 5xx)"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let records_total = GaugeVec::new(
            Opts::new("lmd_records_total", "Registry records by status"),
            &["registry", "status"],
        )
        .expect("metric can be created");

        let sessions_active = Gauge::new("lmd_sessions_active", "Active sign-in sessions")
            .expect("metric can be created");

        registry
            .register(Box::new(http_requests_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_request_duration_seconds.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(http_errors_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(records_total.clone()))
            .expect("metric can be registered");
        registry
            .register(Box::new(sessions_active.clone()))
            .expect("metric can be registered");

        Self {
            inner: Arc::new(Inner {
                registry,
                http_requests_total,
                http_request_duration_seconds,
                http_errors_total,
                records_total,
                sessions_active,
            }),
        }
    }

    /// Registry records gauge, labeled by registry name and status.
    pub fn records_total(&self) -> &GaugeVec {
        &self.inner.records_total
    }

    /// Active sessions gauge.
    pub fn sessions_active(&self) -> &Gauge {
        &self.inner.sessions_active
    }

    /// Record one completed HTTP request.
    fn observe(&self, method: &str, path: &str, status: u16, elapsed_secs: f64) {
        let status_label = status.to_string();
        self.inner
            .http_requests_total
            .with_label_values(&[method, path, &status_label])
            .inc();
        self.inner
            .http_request_duration_seconds
            .with_label_values(&[method, path])
            .observe(elapsed_secs);
        if status >= 400 {
            self.inner
                .http_errors_total
                .with_label_values(&[method, path, &status_label])
                .inc();
        }
    }

    /// Gather all metrics and encode in Prometheus text exposition format.
    pub fn gather_and_encode(&self) -> Result<String, String> {
        let families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&families, &mut buffer)
            .map_err(|e| e.to_string())?;
        String::from_utf8(buffer).map_err(|e| e.to_string())
    }
}

impl Default for ApiMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Axum middleware recording request count, latency, and error count.
///
/// Uses the matched route template (`/v1/applications/{id}`) as the path
/// label rather than the raw URI, keeping label cardinality bounded.
pub async fn metrics_middleware(
    Extension(metrics): Extension<ApiMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let start = Instant::now();
    let response = next.run(request).await;
    let elapsed = start.elapsed().as_secs_f64();

    metrics.observe(&method, &path, response.status().as_u16(), elapsed);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_counts_requests_and_errors() {
        let metrics = ApiMetrics::new();
        metrics.observe("GET", "/v1/licenses", 200, 0.003);
        metrics.observe("GET", "/v1/licenses", 404, 0.001);

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains("lmd_http_requests_total"));
        assert!(text.contains("lmd_http_errors_total"));
        assert!(text.contains("status=\"404\""));
    }

    #[test]
    fn registry_gauges_render() {
        let metrics = ApiMetrics::new();
        metrics
            .records_total()
            .with_label_values(&["licenses", "active"])
            .set(7.0);
        metrics.sessions_active().set(2.0);

        let text = metrics.gather_and_encode().unwrap();
        assert!(text.contains("lmd_records_total"));
        assert!(text.contains("registry=\"licenses\""));
        assert!(text.contains("lmd_sessions_active 2"));
    }
}
