//! # lmd-api — Axum API Service for the Legal Metrology Consoles
//!
//! The server side of the department's administration consoles. Each
//! console screen maps to one route; every list screen shares the same
//! server-evaluated filter → paginate → present pipeline from `lmd-query`.
//!
//! ## API Surface
//!
//! | Prefix                | Module                   | Screen              |
//! |-----------------------|--------------------------|---------------------|
//! | `/v1/auth/*`          | [`routes::auth`]         | Sign-in             |
//! | `/v1/dashboard`       | [`routes::dashboard`]    | Dashboard           |
//! | `/v1/applications/*`  | [`routes::applications`] | Applications        |
//! | `/v1/licenses/*`      | [`routes::licenses`]     | Licenses            |
//! | `/v1/inspections/*`   | [`routes::inspections`]  | Inspections         |
//! | `/v1/districts/*`     | [`routes::districts`]    | Districts           |
//! | `/v1/users`           | [`routes::users`]        | User administration |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```
//!
//! Health probes (`/health/*`), `/metrics`, `/openapi.json`, and the login
//! route are mounted outside the auth middleware.
//!
//! ## Crate Policy
//!
//! - No registry logic in route handlers — lifecycle rules live in
//!   `lmd-state`, list semantics in `lmd-query`.
//! - All errors map to structured HTTP responses via [`AppError`].

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod seed;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::response::IntoResponse;
use axum::{Extension, Router};
use tower_http::trace::TraceLayer;

use crate::middleware::metrics::ApiMetrics;
use crate::state::AppState;

pub use error::AppError;

/// Check if metrics are enabled via the `LMD_METRICS_ENABLED` env var.
/// Defaults to `true` when the variable is absent or set to anything other
/// than `"false"`.
fn metrics_enabled() -> bool {
    std::env::var("LMD_METRICS_ENABLED")
        .map(|v| v.to_lowercase() != "false")
        .unwrap_or(true)
}

/// Assemble the full application router with all routes and middleware.
///
/// The login route, health probes, `/metrics`, and `/openapi.json` are
/// mounted outside the auth middleware so they remain reachable without a
/// session.
pub fn app(state: AppState) -> Router {
    let metrics = ApiMetrics::new();
    let metrics_on = metrics_enabled();

    // Session-protected API routes.
    //
    // Body size limit: 1 MiB. The consoles submit small JSON forms; anything
    // larger is a client defect.
    let mut api = Router::new()
        .merge(routes::dashboard::router())
        .merge(routes::applications::router())
        .merge(routes::licenses::router())
        .merge(routes::inspections::router())
        .merge(routes::districts::router())
        .merge(routes::users::router())
        .merge(routes::auth::session_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(from_fn_with_state(state.clone(), auth::auth_middleware));

    // Only register the metrics middleware when metrics are enabled.
    if metrics_on {
        api = api
            .layer(from_fn(middleware::metrics::metrics_middleware))
            .layer(Extension(metrics.clone()));
    }

    let api = api
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    // Unauthenticated surface: probes, metrics scrape, spec, and the door.
    let mut public = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .merge(routes::auth::public_router())
        .merge(openapi::router());

    if metrics_on {
        public = public
            .route("/metrics", axum::routing::get(prometheus_metrics))
            .layer(Extension(metrics));
    }

    let public = public.with_state(state);

    Router::new().merge(public).merge(api)
}

/// GET /metrics — Prometheus metrics scrape endpoint.
///
/// Updates registry gauges from current `AppState` on each scrape (pull
/// model), then gathers and encodes all metrics in text exposition format.
async fn prometheus_metrics(
    State(state): State<AppState>,
    Extension(metrics): Extension<ApiMetrics>,
) -> impl IntoResponse {
    let records = metrics.records_total();
    records.reset();

    for app in state.applications.list() {
        records
            .with_label_values(&["applications", app.state.as_str()])
            .inc();
    }
    for lic in state.licenses.list() {
        records
            .with_label_values(&["licenses", lic.state.as_str()])
            .inc();
    }
    for visit in state.inspections.list() {
        records
            .with_label_values(&["inspections", visit.state.as_str()])
            .inc();
    }
    for user in state.users.list() {
        records
            .with_label_values(&["users", user.status_str()])
            .inc();
    }
    records
        .with_label_values(&["districts", "total"])
        .set(state.districts.len() as f64);

    metrics.sessions_active().set(state.sessions.len() as f64);

    match metrics.gather_and_encode() {
        Ok(body) => (
            StatusCode::OK,
            [(
                axum::http::header::CONTENT_TYPE,
                "text/plain; version=0.0.4; charset=utf-8",
            )],
            body,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e).into_response()
        }
    }
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — verifies the registries are loaded and reachable.
///
/// Returns 200 "ready" or 503 with a diagnostic message.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    // Verify stores are accessible (read lock acquirable).
    let _ = state.applications.len();
    let _ = state.licenses.len();
    let _ = state.inspections.len();
    let _ = state.users.len();

    // The district reference table is loaded at startup; an empty table
    // means seeding never ran.
    if state.districts.is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "registries not seeded").into_response();
    }

    (StatusCode::OK, "ready").into_response()
}
