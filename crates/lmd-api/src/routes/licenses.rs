//! # License Registry
//!
//! List/issue/detail plus the lifecycle actions of the licensing desk.
//! Numbers follow the department's `LM-<CAT>-<seq>` convention unless the
//! caller supplies one.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use lmd_core::{LicenseCategory, Role, Timestamp};
use lmd_state::{LicenseError, LicenseRecord, TransitionEvidence};

use crate::auth::{require_role, CallerIdentity};
use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_field, Validate};
use crate::routes::applications::ActionRequest;
use crate::routes::{list_response, ListParams, ListResponse};
use crate::state::AppState;

/// Issue-license request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateLicenseRequest {
    pub holder: String,
    #[schema(value_type = String)]
    pub category: LicenseCategory,
    /// District code the license belongs to.
    pub district: String,
    /// End of validity, RFC 3339.
    pub valid_until: String,
    #[serde(default)]
    pub instrument_count: Option<u32>,
    #[serde(default)]
    pub number: Option<String>,
}

impl Validate for CreateLicenseRequest {
    fn validate(&self) -> Result<(), String> {
        require_field("holder", &self.holder)?;
        require_field("district", &self.district)?;
        require_field("valid_until", &self.valid_until)?;
        if let Some(ref number) = self.number {
            require_field("number", number)?;
        }
        Ok(())
    }
}

fn category_code(category: LicenseCategory) -> &'static str {
    match category {
        LicenseCategory::Manufacturer => "MFR",
        LicenseCategory::Dealer => "DLR",
        LicenseCategory::Repairer => "RPR",
        LicenseCategory::Packer => "PKR",
        LicenseCategory::Importer => "IMP",
    }
}

/// Build the licenses router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/licenses", get(list_licenses).post(create_license))
        .route("/v1/licenses/{id}", get(get_license))
        .route("/v1/licenses/{id}/activate", post(activate_license))
        .route("/v1/licenses/{id}/suspend", post(suspend_license))
        .route("/v1/licenses/{id}/reinstate", post(reinstate_license))
        .route("/v1/licenses/{id}/revoke", post(revoke_license))
        .route("/v1/licenses/{id}/expire", post(expire_license))
}

/// GET /v1/licenses — Filtered, paginated license list.
#[utoipa::path(
    get,
    path = "/v1/licenses",
    params(ListParams),
    responses((status = 200, description = "Filtered page of licenses")),
    tag = "licenses"
)]
pub(crate) async fn list_licenses(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Query(params): Query<ListParams>,
) -> Json<ListResponse<LicenseRecord>> {
    Json(list_response(
        state.licenses.list(),
        &params,
        state.config.page_size,
    ))
}

/// POST /v1/licenses — Issue a new license.
#[utoipa::path(
    post,
    path = "/v1/licenses",
    request_body = CreateLicenseRequest,
    responses(
        (status = 201, description = "License issued"),
        (status = 422, description = "Validation failure"),
    ),
    tag = "licenses"
)]
pub(crate) async fn create_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    body: Result<Json<CreateLicenseRequest>, JsonRejection>,
) -> Result<(axum::http::StatusCode, Json<LicenseRecord>), AppError> {
    require_role(&caller, Role::Officer)?;
    let req = extract_validated_json(body)?;

    if !state.districts.contains(&req.district) {
        return Err(AppError::Validation(format!(
            "unknown district code {:?}",
            req.district
        )));
    }
    let valid_until = Timestamp::parse(&req.valid_until)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let number = req.number.clone().unwrap_or_else(|| {
        format!(
            "LM-{}-{:04}",
            category_code(req.category),
            state.licenses.len() + 1
        )
    });

    let record = LicenseRecord::new_issued(
        number,
        req.holder.trim().to_string(),
        req.category,
        req.district.clone(),
        valid_until,
        req.instrument_count.unwrap_or(1),
    );
    let id = record.id;
    state.licenses.insert(id, record.clone());
    tracing::info!(number = %record.number, district = %record.district, "license issued");
    Ok((axum::http::StatusCode::CREATED, Json(record)))
}

/// GET /v1/licenses/{id} — License detail with transition log.
#[utoipa::path(
    get,
    path = "/v1/licenses/{id}",
    responses(
        (status = 200, description = "License detail"),
        (status = 404, description = "No such license"),
    ),
    tag = "licenses"
)]
pub(crate) async fn get_license(
    State(state): State<AppState>,
    _caller: CallerIdentity,
    Path(id): Path<Uuid>,
) -> Result<Json<LicenseRecord>, AppError> {
    state
        .licenses
        .get(&id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("license {id} not found")))
}

fn apply_transition(
    state: &AppState,
    id: Uuid,
    f: impl FnOnce(&mut LicenseRecord) -> Result<(), LicenseError>,
) -> Result<Json<LicenseRecord>, AppError> {
    match state.licenses.try_update(&id, |lic| f(lic).map(|()| lic.clone())) {
        None => Err(AppError::NotFound(format!("license {id} not found"))),
        Some(Err(e)) => Err(e.into()),
        Some(Ok(lic)) => Ok(Json(lic)),
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

/// POST /v1/licenses/{id}/activate — Activate an issued license.
#[utoipa::path(
    post,
    path = "/v1/licenses/{id}/activate",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Activated"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "licenses"
)]
pub(crate) async fn activate_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<LicenseRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "fee realized");
    apply_transition(&state, id, |lic| lic.activate(ev))
}

/// POST /v1/licenses/{id}/suspend — Suspend an active license.
#[utoipa::path(
    post,
    path = "/v1/licenses/{id}/suspend",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Suspended"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "licenses"
)]
pub(crate) async fn suspend_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<LicenseRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "suspended pending enquiry");
    apply_transition(&state, id, |lic| lic.suspend(ev))
}

/// POST /v1/licenses/{id}/reinstate — Reinstate a suspended license.
#[utoipa::path(
    post,
    path = "/v1/licenses/{id}/reinstate",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Reinstated"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "licenses"
)]
pub(crate) async fn reinstate_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<LicenseRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "enquiry closed");
    apply_transition(&state, id, |lic| lic.reinstate(ev))
}

/// POST /v1/licenses/{id}/revoke — Revoke permanently.
#[utoipa::path(
    post,
    path = "/v1/licenses/{id}/revoke",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Revoked"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "licenses"
)]
pub(crate) async fn revoke_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<LicenseRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "license revoked");
    apply_transition(&state, id, |lic| lic.revoke(ev))
}

/// POST /v1/licenses/{id}/expire — Mark validity as ended.
#[utoipa::path(
    post,
    path = "/v1/licenses/{id}/expire",
    request_body = ActionRequest,
    responses(
        (status = 200, description = "Expired"),
        (status = 409, description = "Invalid transition"),
    ),
    tag = "licenses"
)]
pub(crate) async fn expire_license(
    State(state): State<AppState>,
    caller: CallerIdentity,
    Path(id): Path<Uuid>,
    body: Option<Json<ActionRequest>>,
) -> Result<Json<LicenseRecord>, AppError> {
    require_role(&caller, Role::Officer)?;
    let ev = evidence(&caller, body, "validity period ended");
    apply_transition(&state, id, |lic| lic.expire(ev))
}
