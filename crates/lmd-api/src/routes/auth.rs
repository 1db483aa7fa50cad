//! # Sign-In / Sign-Out
//!
//! `POST /v1/auth/login` is mounted outside the auth middleware; it is the
//! door. `POST /v1/auth/logout` runs inside it and revokes the presented
//! token. A credential mismatch is a plain 401 notification — no lockout,
//! no rate limiting, matching the department's observed sign-in behavior.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lmd_core::Role;

use crate::auth::verify_credentials;
use crate::error::AppError;
use crate::extractors::{extract_validated_json, require_field, Validate};
use crate::state::AppState;

/// Sign-in request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), String> {
        require_field("username", &self.username)?;
        if self.password.is_empty() {
            return Err("password is required".to_string());
        }
        Ok(())
    }
}

/// Sign-in response: the bearer token and the role that gates which
/// dashboard variant the console shows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque session token for the `Authorization: Bearer` header.
    pub token: String,
    pub username: String,
    #[schema(value_type = String)]
    pub role: Role,
    /// District the account is scoped to, if any.
    pub district: Option<String>,
}

/// Sign-out acknowledgement.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LogoutResponse {
    pub message: String,
}

/// Routes mounted outside the auth middleware.
pub fn public_router() -> Router<AppState> {
    Router::new().route("/v1/auth/login", post(login))
}

/// Routes mounted inside the auth middleware.
pub fn session_router() -> Router<AppState> {
    Router::new().route("/v1/auth/logout", post(logout))
}

/// POST /v1/auth/login — Exchange credentials for a session token.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = LoginResponse),
        (status = 401, description = "Invalid username or password"),
        (status = 503, description = "Authentication disabled"),
    ),
    tag = "auth"
)]
pub(crate) async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = extract_validated_json(body)?;

    if !state.config.auth_enabled() {
        return Err(AppError::ServiceUnavailable(
            "authentication is disabled on this deployment".into(),
        ));
    }

    match verify_credentials(&state.config.credentials, &req.username, &req.password) {
        Some(credential) => {
            let token = state.sessions.issue(credential);
            tracing::info!(username = %credential.username, role = %credential.role, "sign-in");
            Ok(Json(LoginResponse {
                token,
                username: credential.username.clone(),
                role: credential.role,
                district: credential.district.clone(),
            }))
        }
        None => {
            tracing::warn!(username = %req.username, "sign-in rejected");
            Err(AppError::Unauthorized("invalid username or password".into()))
        }
    }
}

/// POST /v1/auth/logout — Revoke the presented session token.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    responses(
        (status = 200, description = "Signed out", body = LogoutResponse),
        (status = 401, description = "Not signed in"),
    ),
    tag = "auth"
)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<LogoutResponse>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".into()))?;

    // In disabled-auth mode there is no session to revoke; acknowledge anyway.
    state.sessions.revoke(token);
    Ok(Json(LogoutResponse {
        message: "signed out".into(),
    }))
}
