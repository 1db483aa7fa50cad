//! # Dashboard
//!
//! One endpoint, three variants. The session's role decides which
//! extension block accompanies the common counts: admins get the
//! per-district breakdown, officers get their district's focus numbers,
//! inspectors get their own visit queue. Assembled live from the registry
//! stores on every request — read-only and computationally cheap.

use std::collections::BTreeMap;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lmd_core::{Role, Timestamp};
use lmd_state::InspectionState;

use crate::auth::CallerIdentity;
use crate::state::AppState;

/// The role-gated dashboard payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    /// Role of the session the variant was assembled for.
    #[schema(value_type = String)]
    pub role: Role,
    /// Snapshot time.
    #[schema(value_type = String)]
    pub generated_at: Timestamp,
    /// Record counts per registry.
    pub totals: RegistryTotals,
    /// Applications grouped by lifecycle state.
    pub applications_by_state: BTreeMap<String, usize>,
    /// Licenses grouped by lifecycle state.
    pub licenses_by_state: BTreeMap<String, usize>,
    /// Inspections grouped by lifecycle state.
    pub inspections_by_state: BTreeMap<String, usize>,
    /// Per-district breakdown (admin variant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub districts: Option<Vec<DistrictSnapshot>>,
    /// Focus numbers for the officer's own district (officer variant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district_focus: Option<DistrictFocus>,
    /// The inspector's own visit queue (inspector variant).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_visits: Option<InspectorQueue>,
}

/// Record counts per registry.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryTotals {
    pub applications: usize,
    pub licenses: usize,
    pub inspections: usize,
    pub districts: usize,
    pub users: usize,
}

/// Per-district activity counts for the admin variant.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DistrictSnapshot {
    pub code: String,
    pub name: String,
    pub applications: usize,
    pub licenses: usize,
    pub inspections: usize,
}

/// The officer variant's focus numbers for one district.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DistrictFocus {
    pub district: String,
    /// Applications waiting on the desk (submitted or under scrutiny).
    pub applications_pending: usize,
    pub licenses_active: usize,
    /// Visits not yet closed.
    pub inspections_open: usize,
}

/// The inspector variant's personal queue.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InspectorQueue {
    /// Visits assigned to this inspector, all states.
    pub assigned: usize,
    /// Assigned visits not yet closed.
    pub open: usize,
    /// References of the next scheduled visits, soonest first.
    pub upcoming: Vec<String>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/dashboard", get(dashboard))
}

fn count_by<T>(items: &[T], f: impl Fn(&T) -> &'static str) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(f(item).to_string()).or_default() += 1;
    }
    counts
}

/// GET /v1/dashboard — Role-gated summary variant.
#[utoipa::path(
    get,
    path = "/v1/dashboard",
    responses((status = 200, description = "Dashboard variant for the session role", body = DashboardResponse)),
    tag = "dashboard"
)]
pub(crate) async fn dashboard(
    State(state): State<AppState>,
    caller: CallerIdentity,
) -> Json<DashboardResponse> {
    let applications = state.applications.list();
    let licenses = state.licenses.list();
    let inspections = state.inspections.list();

    let totals = RegistryTotals {
        applications: applications.len(),
        licenses: licenses.len(),
        inspections: inspections.len(),
        districts: state.districts.len(),
        users: state.users.len(),
    };

    let mut response = DashboardResponse {
        role: caller.role,
        generated_at: Timestamp::now(),
        totals,
        applications_by_state: count_by(&applications, |a| a.state.as_str()),
        licenses_by_state: count_by(&licenses, |l| l.state.as_str()),
        inspections_by_state: count_by(&inspections, |i| i.state.as_str()),
        districts: None,
        district_focus: None,
        my_visits: None,
    };

    match caller.role {
        Role::Admin => {
            let snapshots = state
                .districts
                .list()
                .into_iter()
                .map(|d| DistrictSnapshot {
                    applications: applications.iter().filter(|a| a.district == d.code).count(),
                    licenses: licenses.iter().filter(|l| l.district == d.code).count(),
                    inspections: inspections.iter().filter(|i| i.district == d.code).count(),
                    code: d.code,
                    name: d.name,
                })
                .collect();
            response.districts = Some(snapshots);
        }
        Role::Officer => {
            if let Some(code) = caller.district.clone() {
                response.district_focus = Some(DistrictFocus {
                    applications_pending: applications
                        .iter()
                        .filter(|a| {
                            a.district == code
                                && matches!(
                                    a.state.as_str(),
                                    "submitted" | "scrutiny" | "returned"
                                )
                        })
                        .count(),
                    licenses_active: licenses
                        .iter()
                        .filter(|l| l.district == code && l.state.as_str() == "active")
                        .count(),
                    inspections_open: inspections
                        .iter()
                        .filter(|i| i.district == code && !i.state.is_terminal())
                        .count(),
                    district: code,
                });
            }
        }
        Role::Inspector => {
            if let Some(username) = caller.username.clone() {
                let mine: Vec<_> = inspections
                    .iter()
                    .filter(|i| i.inspector == username)
                    .collect();
                let mut scheduled: Vec<_> = mine
                    .iter()
                    .filter(|i| i.state == InspectionState::Scheduled)
                    .collect();
                scheduled.sort_by_key(|i| i.scheduled_for);
                response.my_visits = Some(InspectorQueue {
                    assigned: mine.len(),
                    open: mine.iter().filter(|i| !i.state.is_terminal()).count(),
                    upcoming: scheduled
                        .iter()
                        .take(5)
                        .map(|i| i.reference.clone())
                        .collect(),
                });
            }
        }
    }

    Json(response)
}
