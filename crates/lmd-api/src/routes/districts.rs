//! # District Reference Data
//!
//! Read-only: the district cards and the per-district detail view. The
//! region select on the district screen rides the shared `category`
//! parameter.

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use lmd_core::District;

use crate::auth::CallerIdentity;
use crate::error::AppError;
use crate::routes::{list_response, ListParams, ListResponse};
use crate::state::AppState;

/// Build the districts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/districts", get(list_districts))
        .route("/v1/districts/{code}", get(get_district))
}

/// GET /v1/districts — Filtered, paginated district list.
#[utoipa::path(
    get,
    path = "/v1/districts",
    params(ListParams),
    responses((status = 200, description = "Filtered page of districts")),
    tag = "districts"
)]
pub(crate) async fn list_districts(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(params): Query<ListParams>,
) -> Json<ListResponse<District>> {
    Json(list_response(
        state.districts.list(),
        &params,
        state.config.page_size,
    ))
}

/// GET /v1/districts/{code} — District detail.
#[utoipa::path(
    get,
    path = "/v1/districts/{code}",
    responses(
        (status = 200, description = "District detail"),
        (status = 404, description = "No such district"),
    ),
    tag = "districts"
)]
pub(crate) async fn get_district(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(code): Path<String>,
) -> Result<Json<District>, AppError> {
    state
        .districts
        .get(&code)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("district {code:?} not found")))
}
