//! # Staff Directory
//!
//! Admin-only listing of department accounts. Role filters ride the shared
//! `category` parameter; the status chip is `active`/`disabled`.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use lmd_core::{Role, UserRecord};

use crate::auth::{require_role, CallerIdentity};
use crate::error::AppError;
use crate::routes::{list_response, ListParams, ListResponse};
use crate::state::AppState;

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/users", get(list_users))
}

/// GET /v1/users — Filtered, paginated staff directory (admin only).
#[utoipa::path(
    get,
    path = "/v1/users",
    params(ListParams),
    responses(
        (status = 200, description = "Filtered page of users"),
        (status = 403, description = "Admin role required"),
    ),
    tag = "users"
)]
pub(crate) async fn list_users(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Query(params): Query<ListParams>,
) -> Result<Json<ListResponse<UserRecord>>, AppError> {
    require_role(&caller, Role::Admin)?;
    Ok(Json(list_response(
        state.users.list(),
        &params,
        state.config.page_size,
    )))
}
