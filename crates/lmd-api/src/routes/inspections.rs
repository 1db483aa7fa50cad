//! # Inspection Roster
//!
//! List/schedule/detail, lifecycle actions, and field location capture.
//! Officers manage the whole roster; inspectors act only on their own
//! visits (ownership is checked against the assigned username).
//!
//! The location endpoint is the server side of the field app's one-shot
//! GPS capture: the fix is validated and stored, or rejected with a
//! notification message. No retry, no cancellation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use lmd_core::{InspectionKind, Priority, Role, Timestamp};
use lmd_state::{GeoFix, InspectionError, InspectionRecord, TransitionEvidence};

use crate::auth::{require_role, CallerIdentity};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_field, Validate};
use crate::routes::applications::ActionRequest;
use crate::routes::{list_response, ListParams, ListResponse};
use crate::state::AppState;

/// Schedule-inspection request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateInspectionRequest {
    pub establishment: String,
    /// District code of the visit.
    pub district: String,
    /// Username of the assigned inspector.
    pub inspector: String,
    #[schema(value_type = String)]
    pub kind: InspectionKind,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub priority: Option<Priority>,
    /// Visit date, RFC 3339.
    pub scheduled_for: String,
    #[serde(default)]
    pub reference: Option<String>,
}

impl Validate for CreateInspectionRequest {
    fn validate(&self) -> Result<(), String> {
        require_field("establishment", &self.establishment)?;
        require_field("district", &self.district)?;
        require_field("inspector", &self.inspector)?;
        require_field("scheduled_for", &self.scheduled_for)?;
        Ok(())
    }
}

/// One-shot GPS fix from the field app.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Device-reported accuracy radius in meters.
    #[serde(default)]
    pub accuracy_m: Option<f64>,
}

/// Build the inspections router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/inspections", get(list_inspections).post(create_inspection))
        .route("/v1/inspections/{id}", get(get_inspection))
        .route("/v1/inspections/{id}/start", post(start_inspection))
        .route("/v1/inspections/{id}/complete", post(complete_inspection))
        .route("/v1/inspections/{id}/cancel", post(cancel_inspection))
        .route("/v1/inspections/{id}/location", post(record_location))
}

/// GET /v1/inspections — Filtered, paginated inspection roster.
#[utoipa::path(
    get,
    path = "/v1/inspections",
    params(ListParams),
    responses((status = 200, description = "Filtered page of inspections")),
    tag = "inspections"
)]
pub(crate) async fn list_inspections(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(params): Query<ListParams>,
) -> Json<ListResponse<InspectionRecord>> {
    Json(list_response(
        state.inspections.list(),
        &params,
        state.config.page_size,
    ))
}

/// POST /v1/inspections — Schedule a visit.
#[utoipa::path(
    post,
    path = "/v1/inspections",
    request_body = CreateInspectionRequest,
    responses(
        (status = 201, description = "Visit scheduled"),
        (status = 422, description = "Validation failure"),
    ),
    tag = "inspections"
)]
pub(crate) async fn create_inspection(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateInspectionRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<InspectionRecord>), AppError> {
    require_role(&caller, Role::Officer)?;
    let req = extract_validated_json(body)?;

    if !state.districts.contains(&req.district) {
        return Err(AppError::Validation(format!(
            "unknown district code {:?}",
            req.district
        )));
    }
    let known_inspector = state
        .users
        .list()
        .iter()
        .any(|u| u.username == req.inspector && u.active);
    if !known_inspector {
        return Err(AppError::Validation(format!(
            "no active account for inspector {:?}",
            req.inspector
        )));
    }
    let scheduled_for = Timestamp::parse(&req.scheduled_for)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let reference = req.reference.clone().unwrap_or_else(|| {
        format!("LM-INS-{:04}", state.inspections.len() + 1)
    });

    let record = InspectionRecord::new_scheduled(
        reference,
        req.establishment.trim().to_string(),
        req.district.clone(),
        req.inspector.clone(),
        req.kind,
        req.priority.unwrap_or(Priority::Medium),
        scheduled_for,
    );
    let id = record.id;
    state.inspections.insert(id, record.clone());
    tracing::info!(reference = %record.reference, inspector = %record.inspector, "inspection scheduled");
    Ok((axum::http::StatusCode::CREATED, Json(record)))
}

/// GET /v1/inspections/{id} — Visit detail with transition log.
#[utoipa::path(
    get,
    path = "/v1/inspections/{id}",
    responses(
        (status = 200, description = "Inspection detail"),
        (status = 404, description = "No such inspection"),
    ),
    tag = "inspections"
)]
pub(crate) async fn get_inspection(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<InspectionRecord>, AppError> {
    state
        .inspections
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("inspection {id} not found")))
}

/// Inspectors act only on their own visits; officers and admins on any.
fn check_ownership(caller: &CallerIdentity, record: &InspectionRecord) -> Result<(), AppError> {
    if caller.role >= Role::Officer {
        return Ok(());
    }
    match &caller.username {
        Some(username) if *username == record.inspector => Ok(()),
        _ => Err(AppError::Forbidden(format!(
            "visit {} is assigned to {}",
            record.reference, record.inspector
        ))),
    }
}

fn apply_transition(
    state: &AppState,
    caller: &CallerIdentity,
    id: Uuid,
    f: impl FnOnce(&mut InspectionRecord) -> Result<(), InspectionError>,
) -> Result<Json<InspectionRecord>, AppError> {
    let result = state.inspections.try_update(&id, |visit| {
        check_ownership(caller, visit).map_err(TransitionOutcome::Denied)?;
        f(visit)
            .map(|()| visit.clone())
            .map_err(TransitionOutcome::Rejected)
    });
    match result {
        None => Err(AppError::NotFound(format!("inspection {id} not found"))),
        Some(Err(TransitionOutcome::Denied(e))) => Err(e),
        Some(Err(TransitionOutcome::Rejected(e))) => Err(e.into()),
        Some(Ok(visit)) => Ok(Json(visit)),
    }
}

/// Distinguishes an authorization denial from a lifecycle rejection inside
/// the single-lock update closure.
enum TransitionOutcome {
    Denied(AppError),
    Rejected(InspectionError),
}

fn evidence(caller: &CallerIdentity, req: Option<Json<ActionRequest>>, fallback: &str) -> TransitionEvidence {
    TransitionEvidence {
        reason: req
            .and_then(|Json(r)| r.reason)
            .unwrap_or_else(|| fallback.to_string()),
        actor: caller.username.clone(),
    }
}

/// POST /v1/inspections/{id}/start — Begin the visit.
#[utoipa::path(
    post,
    path = "/v1/inspections/{id}/start",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Visit started"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "inspections"
)]
pub(crate) async fn start_inspection(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<InspectionRecord>, AppError> {
    require_role(&caller, Role::Inspector)?;
    let ev = evidence(&caller, body, "arrived on site");
    apply_transition(&state, &caller, id, |visit| visit.start(ev))
}

/// POST /v1/inspections/{id}/complete — File the report and close.
#[utoipa::path(
    post,
    path = "/v1/inspections/{id}/complete",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Visit completed"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "inspections"
)]
pub(crate) async fn complete_inspection(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<InspectionRecord>, AppError> {
    require_role(&caller, Role::Inspector)?;
    let ev = evidence(&caller, body, "report filed");
    apply_transition(&state, &caller, id, |visit| visit.complete(ev))
}

/// POST /v1/inspections/{id}/cancel — Call the visit off.
#[utoipa::path(
    post,
    path = "/v1/inspections/{id}/cancel",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Visit cancelled"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "inspections"
)]
pub(crate) async fn cancel_inspection(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<InspectionRecord>, AppError> {
    require_role(&caller, Role::Inspector)?;
    let ev = evidence(&caller, body, "visit called off");
    apply_transition(&state, &caller, id, |visit| visit.cancel(ev))
}

/// POST /v1/inspections/{id}/location — Record the field GPS fix.
#[utoipa::path(
    post,
    path = "/v1/inspections/{id}/location",
    request_body = LocationRequest,
    responses(
        (status = 200, description = "Fix recorded"),
        (status = 422, description = "Fix rejected"),
    ),
    tag = "inspections"
)]
pub(crate) async fn record_location(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Result<Json<LocationRequest>, JsonRejection>,
) -> Result<Json<InspectionRecord>, AppError> {
    require_role(&caller, Role::Inspector)?;
    let req = body
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))?;

    let fix = GeoFix::new(req.latitude, req.longitude, req.accuracy_m)
        .map_err(AppError::Validation)?;

    apply_transition(&state, &caller, id, |visit| visit.record_location(fix))
}
