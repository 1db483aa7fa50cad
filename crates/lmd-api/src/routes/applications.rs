//! # License Application Registry
//!
//! List/create/detail plus the lifecycle actions of the scrutiny desk.
//! Mutations require the officer role; reads are open to any signed-in
//! account. Lifecycle rejections surface as 409 Conflict with the reason
//! in the notification message.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use lmd_core::{ApplicationKind, LicenseCategory, Priority, Role};
use lmd_state::{ApplicationError, ApplicationRecord, TransitionEvidence};

use crate::auth::{require_role, CallerIdentity};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_field, Validate};
use crate::routes::{list_response, ListParams, ListResponse};
use crate::state::AppState;

/// Create-application request. The file reference is assigned by the
/// server unless the caller provides one.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateApplicationRequest {
    pub applicant: String,
    #[schema(value_type = String)]
    pub kind: ApplicationKind,
    #[schema(value_type = String)]
    pub category: LicenseCategory,
    /// District code the application is filed in.
    pub district: String,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub priority: Option<Priority>,
    /// Scrutiny fee in rupees.
    #[serde(default)]
    pub fee: Option<u32>,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Validate for CreateApplicationRequest {
    fn validate(&self) -> Result<(), String> {
        require_field("applicant", &self.applicant)?;
        require_field("district", &self.district)?;
        if let Some(ref reference) = self.reference {
            require_field("reference", reference)?;
        }
        Ok(())
    }
}

/// Optional context for a lifecycle action.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ActionRequest {
    /// Reason recorded in the transition log.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Build the applications router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/applications", get(list_applications).post(create_application))
        .route("/v1/applications/{id}", get(get_application))
        .route("/v1/applications/{id}/submit", post(submit_application))
        .route("/v1/applications/{id}/scrutiny", post(scrutinize_application))
        .route("/v1/applications/{id}/approve", post(approve_application))
        .route("/v1/applications/{id}/reject", post(reject_application))
        .route("/v1/applications/{id}/return", post(return_application))
        .route("/v1/applications/{id}/resubmit", post(resubmit_application))
}

/// GET /v1/applications — Filtered, paginated application list.
#[utoipa::path(
    get,
    path = "/v1/applications",
    params(ListParams),
    responses((status = 200, description = "Filtered page of applications")),
    tag = "applications"
)]
pub(crate) async fn list_applications(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(params): Query<ListParams>,
) -> Json<ListResponse<ApplicationRecord>> {
    Json(list_response(
        state.applications.list(),
        &params,
        state.config.page_size,
    ))
}

/// POST /v1/applications — File a new application (draft).
#[utoipa::path(
    post,
    path = "/v1/applications",
    request_body = CreateApplicationRequest,
    responses(
        (status = 201, description = "Application filed"),
        (status = 422, description = "Validation failure"),
    ),
    tag = "applications"
)]
pub(crate) async fn create_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateApplicationRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<ApplicationRecord>), AppError> {
    require_role(&caller, Role::Officer)?;
    let req = extract_validated_json(body)?;

    if !state.districts.contains(&req.district) {
        return Err(AppError::Validation(format!(
            "unknown district code {:?}",
            req.district
        )));
    }

    let reference = req.reference.clone().unwrap_or_else(|| {
        format!(
            "LM-APP-{}-{:04}",
            Utc::now().year(),
            state.applications.len() + 1
        )
    });

    let record = ApplicationRecord::new_draft(
        reference,
        req.applicant.trim().to_string(),
        req.kind,
        req.category,
        req.district.clone(),
        req.priority.unwrap_or(Priority::Medium),
        req.fee.unwrap_or(100),
    );
    let id = record.id;
    state.applications.insert(id, record.clone());
    tracing::info!(reference = %record.reference, district = %record.district, "application filed");
    Ok((axum::http::StatusCode::CREATED, Json(record)))
}

/// GET /v1/applications/{id} — Application detail with transition log.
#[utoipa::path(
    get,
    path = "/v1/applications/{id}",
    responses(
        (status = 200, description = "Application detail"),
        (status = 404, description = "No such application"),
    ),
    tag = "applications"
)]
pub(crate) async fn get_application(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<ApplicationRecord>, AppError> {
    state
        .applications
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("application {id} not found")))
}

/// Apply one lifecycle transition under the store's write lock.
fn apply_transition(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut ApplicationRecord) -> Result<(), ApplicationError>,
) -> Result<Json<ApplicationRecord>, AppError> {
    match state
        .applications
        .try_update(&id, |app| f(app).map(|()| app.clone()))
    {
        None => Err(AppError::NotFound(format!("application {id} not found"))),
        Some(Err(e)) => Err(e.into()),
        Some(Ok(app)) => Ok(Json(app)),
    }
}

fn evidence(caller: &CallerIdentity, req: Option<Json<ActionRequest>>, fallback: &str) -> TransitionEvidence {
    TransitionEvidence {
        reason: req
            .and_then(|Json(r)| r.reason)
            .unwrap_or_else(|| fallback.to_string()),
        actor: caller.username.clone(),
    }
}

/// POST /v1/applications/{id}/submit — Draft into the queue.
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/submit",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Submitted"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "applications"
)]
pub(crate) async fn submit_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<ApplicationRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "submitted");
    apply_transition(&state, id, |app| app.submit(ev))
}

/// POST /v1/applications/{id}/scrutiny — Take up for scrutiny.
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/scrutiny",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Under scrutiny"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "applications"
)]
pub(crate) async fn scrutinize_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<ApplicationRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "taken up for scrutiny");
    apply_transition(&state, id, |app| app.begin_scrutiny(ev))
}

/// POST /v1/applications/{id}/approve — Approve after scrutiny.
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/approve",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Approved"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "applications"
)]
pub(crate) async fn approve_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<ApplicationRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "documents in order");
    apply_transition(&state, id, |app| app.approve(ev))
}

/// POST /v1/applications/{id}/reject — Reject after scrutiny.
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/reject",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Rejected"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "applications"
)]
pub(crate) async fn reject_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<ApplicationRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "does not meet requirements");
    apply_transition(&state, id, |app| app.reject(ev))
}

/// POST /v1/applications/{id}/return — Return for revision.
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/return",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Returned to applicant"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "applications"
)]
pub(crate) async fn return_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<ApplicationRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "returned for revision");
    apply_transition(&state, id, |app| app.return_for_revision(ev))
}

/// POST /v1/applications/{id}/resubmit — Resubmit after revision.
#[utoipa::path(
    post,
    path = "/v1/applications/{id}/resubmit",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Back in the queue"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "applications"
)]
pub(crate) async fn resubmit_application(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<ApplicationRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "resubmitted with revisions");
    apply_transition(&state, id, |app| app.resubmit(ev))
}
