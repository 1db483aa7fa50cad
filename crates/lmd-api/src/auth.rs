//! # Session Authentication Middleware
//!
//! Credential sign-in with bearer session tokens and role-based access.
//!
//! `POST /v1/auth/login` compares the submitted username/password against
//! the configured credentials (constant-time on the password) and issues an
//! opaque session token. Subsequent requests carry it as
//! `Authorization: Bearer <token>`; the middleware resolves it to a
//! [`CallerIdentity`] injected into request extensions. There is no
//! lockout, rate limiting, or credential hashing beyond this — sign-in
//! failures are a plain 401 the console shows as a notification.
//!
//! With no credentials configured, authentication is disabled and every
//! request runs as an admin session (development mode).

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use parking_lot::RwLock;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use lmd_core::{Role, Timestamp};

use crate::config::Credential;
use crate::error::{AppError, ErrorBody, ErrorDetail};
use crate::state::AppState;

// ── CallerIdentity ──────────────────────────────────────────────────────────

/// Identity of the authenticated caller, available to all route handlers
/// via Axum's `FromRequestParts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Signed-in username; `None` when authentication is disabled.
    pub username: Option<String>,
    /// The caller's role.
    pub role: Role,
    /// District the caller is scoped to, if any.
    pub district: Option<String>,
}

impl CallerIdentity {
    /// Check if the caller has at least the given minimum role.
    ///
    /// `Role` derives `Ord` with `Inspector < Officer < Admin`, so this is
    /// a single comparison.
    pub fn has_role(&self, minimum: Role) -> bool {
        self.role >= minimum
    }

    /// The admin identity injected when authentication is disabled.
    fn disabled_mode() -> Self {
        Self {
            username: None,
            role: Role::Admin,
            district: None,
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CallerIdentity>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("no caller identity in request context".into()))
    }
}

/// Check that the caller has at least the required role.
/// Returns 403 Forbidden if the caller's role is insufficient.
pub fn require_role(caller: &CallerIdentity, minimum: Role) -> Result<(), AppError> {
    if caller.has_role(minimum) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "role '{}' required, caller has '{}'",
            minimum.as_str(),
            caller.role.as_str()
        )))
    }
}

// ── Session Store ───────────────────────────────────────────────────────────

/// One active sign-in session.
#[derive(Debug, Clone)]
pub struct Session {
    pub username: String,
    pub role: Role,
    pub district: Option<String>,
    pub issued_at: Timestamp,
}

/// Thread-safe store of active sessions, keyed by opaque bearer token.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    data: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    /// Create an empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh session token for a signed-in credential.
    pub fn issue(&self, credential: &Credential) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let session = Session {
            username: credential.username.clone(),
            role: credential.role,
            district: credential.district.clone(),
            issued_at: Timestamp::now(),
        };
        self.data.write().insert(token.clone(), session);
        token
    }

    /// Resolve a bearer token to a caller identity.
    pub fn identity(&self, token: &str) -> Option<CallerIdentity> {
        self.data.read().get(token).map(|s| CallerIdentity {
            username: Some(s.username.clone()),
            role: s.role,
            district: s.district.clone(),
        })
    }

    /// Invalidate a session token. Returns whether it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.data.write().remove(token).is_some()
    }

    /// Number of active sessions.
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Whether there are no active sessions.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ── Credential Verification ─────────────────────────────────────────────────

/// Constant-time comparison of two secrets.
///
/// When lengths differ, performs a dummy comparison to avoid leaking
/// length information through timing variance.
fn constant_time_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Find the credential matching a username/password pair.
///
/// The password check is constant-time. When the username is unknown, a
/// dummy password comparison still runs so a miss costs the same as a
/// wrong password.
pub fn verify_credentials<'a>(
    credentials: &'a [Credential],
    username: &str,
    password: &str,
) -> Option<&'a Credential> {
    match credentials.iter().find(|c| c.username == username) {
        Some(cred) => constant_time_eq(password, &cred.password).then_some(cred),
        None => {
            let _ = constant_time_eq(password, "lmd-no-such-account");
            None
        }
    }
}

// ── Middleware ──────────────────────────────────────────────────────────────

/// Resolve the Bearer session token and inject [`CallerIdentity`] into
/// request extensions for downstream handlers.
///
/// When no credentials are configured, all requests are allowed with an
/// admin identity (auth disabled / development mode).
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if !state.config.auth_enabled() {
        request
            .extensions_mut()
            .insert(CallerIdentity::disabled_mode());
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(value) if value.starts_with("Bearer ") => {
            let token = &value[7..];
            match state.sessions.identity(token) {
                Some(identity) => {
                    request.extensions_mut().insert(identity);
                    next.run(request).await
                }
                None => {
                    tracing::warn!("authentication failed: unknown or expired session token");
                    unauthorized_response("session is not valid; sign in again")
                }
            }
        }
        Some(_) => {
            tracing::warn!("authentication failed: non-Bearer authorization scheme");
            unauthorized_response("authorization header must use Bearer scheme")
        }
        None => {
            tracing::warn!("authentication failed: missing authorization header");
            unauthorized_response("missing authorization header")
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = ErrorBody {
        error: ErrorDetail {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
        },
    };
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cred(username: &str, password: &str, role: Role) -> Credential {
        Credential {
            username: username.to_string(),
            password: password.to_string(),
            role,
            district: None,
        }
    }

    // ── Constant-time comparison ─────────────────────────────────

    #[test]
    fn constant_time_eq_identical() {
        assert!(constant_time_eq("secret-123", "secret-123"));
    }

    #[test]
    fn constant_time_eq_rejects_wrong_prefix_and_empty() {
        assert!(!constant_time_eq("wrong", "secret-123"));
        assert!(!constant_time_eq("secret", "secret-123"));
        assert!(!constant_time_eq("", "secret-123"));
    }

    // ── Credential verification ──────────────────────────────────

    #[test]
    fn verify_accepts_matching_pair() {
        let creds = vec![cred("admin", "hunter2", Role::Admin)];
        let found = verify_credentials(&creds, "admin", "hunter2");
        assert_eq!(found.map(|c| c.role), Some(Role::Admin));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let creds = vec![cred("admin", "hunter2", Role::Admin)];
        assert!(verify_credentials(&creds, "admin", "hunter3").is_none());
    }

    #[test]
    fn verify_rejects_unknown_username() {
        let creds = vec![cred("admin", "hunter2", Role::Admin)];
        assert!(verify_credentials(&creds, "intruder", "hunter2").is_none());
    }

    #[test]
    fn verify_username_is_exact_match() {
        let creds = vec![cred("admin", "hunter2", Role::Admin)];
        assert!(verify_credentials(&creds, "Admin", "hunter2").is_none());
    }

    // ── Session store ────────────────────────────────────────────

    #[test]
    fn issue_and_resolve_session() {
        let store = SessionStore::new();
        let officer = cred("d.rao", "pw", Role::Officer);
        let token = store.issue(&officer);

        let identity = store.identity(&token).unwrap();
        assert_eq!(identity.username.as_deref(), Some("d.rao"));
        assert_eq!(identity.role, Role::Officer);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn unknown_token_resolves_to_none() {
        let store = SessionStore::new();
        assert!(store.identity("ffffffffffffffffffffffffffffffff").is_none());
    }

    #[test]
    fn revoke_invalidates_token() {
        let store = SessionStore::new();
        let token = store.issue(&cred("d.rao", "pw", Role::Officer));
        assert!(store.revoke(&token));
        assert!(store.identity(&token).is_none());
        assert!(!store.revoke(&token));
    }

    #[test]
    fn tokens_are_unique_per_issue() {
        let store = SessionStore::new();
        let c = cred("d.rao", "pw", Role::Officer);
        let a = store.issue(&c);
        let b = store.issue(&c);
        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    // ── Roles ────────────────────────────────────────────────────

    #[test]
    fn admin_has_every_role() {
        let admin = CallerIdentity {
            username: Some("a".into()),
            role: Role::Admin,
            district: None,
        };
        assert!(admin.has_role(Role::Inspector));
        assert!(admin.has_role(Role::Officer));
        assert!(admin.has_role(Role::Admin));
    }

    #[test]
    fn inspector_only_has_own_level() {
        let inspector = CallerIdentity {
            username: Some("i".into()),
            role: Role::Inspector,
            district: None,
        };
        assert!(inspector.has_role(Role::Inspector));
        assert!(!inspector.has_role(Role::Officer));
        assert!(require_role(&inspector, Role::Officer).is_err());
    }
}
