//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI spec,
//! served at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer-session security scheme to the OpenAPI spec.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Opaque session token issued by POST /v1/auth/login.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LMD API — Legal Metrology Administration",
        description = "Registry and console API for the legal metrology department: \
            license applications, licenses, inspections, districts, and staff, \
            with server-side filter/paginate/present list semantics and a \
            role-gated dashboard.\n\nAuthentication: bearer session token via \
            `Authorization: Bearer <token>`. All `/v1/*` endpoints except \
            `/v1/auth/login` require a session. Health probes (`/health/*`) \
            and `/metrics` are unauthenticated.",
        license(name = "AGPL-3.0-or-later"),
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("session_token" = [])
    ),
    paths(
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::dashboard::dashboard,
        crate::routes::applications::list_applications,
        crate::routes::applications::create_application,
        crate::routes::applications::get_application,
        crate::routes::applications::submit_application,
        crate::routes::applications::scrutinize_application,
        crate::routes::applications::approve_application,
        crate::routes::applications::reject_application,
        crate::routes::applications::return_application,
        crate::routes::applications::resubmit_application,
        crate::routes::licenses::list_licenses,
        crate::routes::licenses::create_license,
        crate::routes::licenses::get_license,
        crate::routes::licenses::activate_license,
        crate::routes::licenses::suspend_license,
        crate::routes::licenses::reinstate_license,
        crate::routes::licenses::revoke_license,
        crate::routes::licenses::expire_license,
        crate::routes::inspections::list_inspections,
        crate::routes::inspections::create_inspection,
        crate::routes::inspections::get_inspection,
        crate::routes::inspections::start_inspection,
        crate::routes::inspections::complete_inspection,
        crate::routes::inspections::cancel_inspection,
        crate::routes::inspections::record_location,
        crate::routes::districts::list_districts,
        crate::routes::districts::get_district,
        crate::routes::users::list_users,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::auth::LoginRequest,
        crate::routes::auth::LoginResponse,
        crate::routes::auth::LogoutResponse,
        crate::routes::applications::CreateApplicationRequest,
        crate::routes::applications::ActionRequest,
        crate::routes::licenses::CreateLicenseRequest,
        crate::routes::inspections::CreateInspectionRequest,
        crate::routes::inspections::LocationRequest,
        crate::routes::dashboard::DashboardResponse,
        crate::routes::dashboard::RegistryTotals,
        crate::routes::dashboard::DistrictSnapshot,
        crate::routes::dashboard::DistrictFocus,
        crate::routes::dashboard::InspectorQueue,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Sign-in and sign-out"),
        (name = "dashboard", description = "Role-gated summary"),
        (name = "applications", description = "License application registry"),
        (name = "licenses", description = "License registry"),
        (name = "inspections", description = "Inspection roster"),
        (name = "districts", description = "District reference data"),
        (name = "users", description = "Staff directory"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(serve_openapi))
}

/// GET /openapi.json — The generated spec.
async fn serve_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_includes_every_console_surface() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();
        for path in [
            "/v1/auth/login",
            "/v1/dashboard",
            "/v1/applications",
            "/v1/licenses",
            "/v1/inspections",
            "/v1/districts",
            "/v1/users",
        ] {
            assert!(json.contains(path), "spec is missing {path}");
        }
    }
}
