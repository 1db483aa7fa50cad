//! # Inspection Lifecycle & Field Location Capture
//!
//! Models an inspection visit from scheduling to its report.
//!
//! ```text
//! Scheduled ──▶ InProgress ──▶ Completed (terminal)
//!     │             │
//!     └─────────────┴──▶ Cancelled (terminal)
//! ```
//!
//! A visit may record one GPS fix while it is open — the field app captures
//! the position once, fire-and-forget. A rejected fix (out-of-range
//! coordinates, closed visit) is surfaced to the inspector as a
//! notification; there is no retry machinery.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use lmd_core::{InspectionKind, Priority, Timestamp};
use lmd_query::{Facet, Filterable, Tabular};

use crate::{TransitionEvidence, TransitionRecord};

// ─── Inspection State ────────────────────────────────────────────────

/// The lifecycle state of an inspection visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionState {
    /// On the roster, not yet begun.
    Scheduled,
    /// Inspector is on site.
    InProgress,
    /// Report filed (terminal).
    Completed,
    /// Called off (terminal).
    Cancelled,
}

impl InspectionState {
    /// Whether this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for InspectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by inspection lifecycle operations.
#[derive(Error, Debug)]
pub enum InspectionError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid inspection transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// Inspection has already been closed.
    #[error("inspection is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: String,
    },

    /// The submitted GPS fix was rejected.
    #[error("location rejected: {0}")]
    LocationRejected(String),
}

// ─── Geo Fix ─────────────────────────────────────────────────────────

/// A single GPS position captured during a visit.
///
/// Validated on construction: latitude within ±90, longitude within ±180,
/// both finite. Accuracy is the device-reported radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoFix {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy_m: Option<f64>,
    pub captured_at: Timestamp,
}

impl GeoFix {
    /// Validate and build a fix captured now.
    pub fn new(latitude: f64, longitude: f64, accuracy_m: Option<f64>) -> Result<Self, String> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(format!("latitude out of range: {latitude}"));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(format!("longitude out of range: {longitude}"));
        }
        if let Some(acc) = accuracy_m {
            if !acc.is_finite() || acc < 0.0 {
                return Err(format!("accuracy out of range: {acc}"));
            }
        }
        Ok(Self {
            latitude,
            longitude,
            accuracy_m,
            captured_at: Timestamp::now(),
        })
    }
}

// ─── Inspection Record ───────────────────────────────────────────────

/// An inspection visit with its lifecycle state and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionRecord {
    pub id: Uuid,
    /// Visit reference, e.g. `"LM-INS-2025-0107"`.
    pub reference: String,
    /// Establishment being inspected.
    pub establishment: String,
    /// District code of the visit.
    pub district: String,
    /// Username of the assigned inspector.
    pub inspector: String,
    pub kind: InspectionKind,
    pub priority: Priority,
    pub scheduled_for: Timestamp,
    pub state: InspectionState,
    /// GPS fix recorded on site, if any.
    pub location: Option<GeoFix>,
    /// Ordered log of all state transitions.
    pub transitions: Vec<TransitionRecord<InspectionState>>,
}

impl InspectionRecord {
    /// Schedule a new visit.
    pub fn new_scheduled(
        reference: String,
        establishment: String,
        district: String,
        inspector: String,
        kind: InspectionKind,
        priority: Priority,
        scheduled_for: Timestamp,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference,
            establishment,
            district,
            inspector,
            kind,
            priority,
            scheduled_for,
            state: InspectionState::Scheduled,
            location: None,
            transitions: Vec::new(),
        }
    }

    /// Begin the visit (SCHEDULED → IN_PROGRESS).
    pub fn start(&mut self, evidence: TransitionEvidence) -> Result<(), InspectionError> {
        self.require_state(InspectionState::Scheduled, InspectionState::InProgress)?;
        self.do_transition(InspectionState::InProgress, evidence);
        Ok(())
    }

    /// File the report and close the visit (IN_PROGRESS → COMPLETED).
    pub fn complete(&mut self, evidence: TransitionEvidence) -> Result<(), InspectionError> {
        self.require_state(InspectionState::InProgress, InspectionState::Completed)?;
        self.do_transition(InspectionState::Completed, evidence);
        Ok(())
    }

    /// Call the visit off (SCHEDULED or IN_PROGRESS → CANCELLED).
    pub fn cancel(&mut self, evidence: TransitionEvidence) -> Result<(), InspectionError> {
        if self.state.is_terminal() {
            return Err(InspectionError::TerminalState {
                state: self.state.to_string(),
            });
        }
        self.do_transition(InspectionState::Cancelled, evidence);
        Ok(())
    }

    /// Record the field position for an open visit.
    ///
    /// One-shot: a later fix overwrites an earlier one, matching the field
    /// app's "capture again" button. Closed visits reject the fix.
    pub fn record_location(&mut self, fix: GeoFix) -> Result<(), InspectionError> {
        if self.state.is_terminal() {
            return Err(InspectionError::LocationRejected(format!(
                "visit already {}",
                self.state
            )));
        }
        self.location = Some(fix);
        Ok(())
    }

    /// Whether the visit has been closed.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    fn require_state(
        &self,
        expected: InspectionState,
        target: InspectionState,
    ) -> Result<(), InspectionError> {
        if self.state.is_terminal() {
            return Err(InspectionError::TerminalState {
                state: self.state.to_string(),
            });
        }
        if self.state != expected {
            return Err(InspectionError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: InspectionState, evidence: TransitionEvidence) {
        self.transitions.push(TransitionRecord {
            from_state: self.state,
            to_state: to,
            at: Timestamp::now(),
            actor: evidence.actor,
            reason: evidence.reason,
        });
        self.state = to;
    }
}

impl Filterable for InspectionRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.reference, &self.establishment, &self.inspector]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.state.as_str()),
            Facet::Category => Some(self.kind.as_str()),
            Facet::Priority => Some(self.priority.as_str()),
            Facet::District => Some(&self.district),
        }
    }
}

impl Tabular for InspectionRecord {
    fn columns() -> &'static [&'static str] {
        &["Reference", "Establishment", "Kind", "District", "Inspector", "Priority", "Status", "Scheduled"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.reference.clone(),
            self.establishment.clone(),
            self.kind.to_string(),
            self.district.clone(),
            self.inspector.clone(),
            self.priority.to_string(),
            self.state.to_string(),
            self.scheduled_for.to_iso8601(),
        ]
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(reason: &str) -> TransitionEvidence {
        TransitionEvidence::by(reason, "r.fernandes")
    }

    fn make_scheduled() -> InspectionRecord {
        InspectionRecord::new_scheduled(
            "LM-INS-2025-0107".to_string(),
            "Meerpur Weighbridge".to_string(),
            "MRP".to_string(),
            "r.fernandes".to_string(),
            InspectionKind::Verification,
            Priority::High,
            Timestamp::parse("2025-07-15T10:00:00Z").unwrap(),
        )
    }

    #[test]
    fn test_schedule_then_start_then_complete() {
        let mut visit = make_scheduled();
        assert_eq!(visit.state, InspectionState::Scheduled);

        visit.start(evidence("arrived on site")).unwrap();
        assert_eq!(visit.state, InspectionState::InProgress);

        visit.complete(evidence("report filed")).unwrap();
        assert!(visit.is_terminal());
        assert_eq!(visit.transitions.len(), 2);
    }

    #[test]
    fn test_cancel_from_scheduled_and_in_progress() {
        let mut visit = make_scheduled();
        visit.cancel(evidence("establishment closed")).unwrap();
        assert_eq!(visit.state, InspectionState::Cancelled);

        let mut visit = make_scheduled();
        visit.start(evidence("arrived")).unwrap();
        visit.cancel(evidence("weighbridge under repair")).unwrap();
        assert_eq!(visit.state, InspectionState::Cancelled);
    }

    #[test]
    fn test_cannot_complete_without_starting() {
        let mut visit = make_scheduled();
        assert!(visit.complete(evidence("shortcut")).is_err());
    }

    #[test]
    fn test_terminal_visit_accepts_nothing() {
        let mut visit = make_scheduled();
        visit.cancel(evidence("off")).unwrap();
        assert!(visit.start(evidence("late")).is_err());
        assert!(visit.cancel(evidence("again")).is_err());
    }

    // ── Location capture ─────────────────────────────────────────────

    #[test]
    fn test_geo_fix_validation() {
        assert!(GeoFix::new(19.0760, 72.8777, Some(12.0)).is_ok());
        assert!(GeoFix::new(91.0, 0.0, None).is_err());
        assert!(GeoFix::new(-91.0, 0.0, None).is_err());
        assert!(GeoFix::new(0.0, 181.0, None).is_err());
        assert!(GeoFix::new(0.0, -181.0, None).is_err());
        assert!(GeoFix::new(f64::NAN, 0.0, None).is_err());
        assert!(GeoFix::new(0.0, 0.0, Some(-1.0)).is_err());
    }

    #[test]
    fn test_record_location_on_open_visit() {
        let mut visit = make_scheduled();
        visit.start(evidence("arrived")).unwrap();
        let fix = GeoFix::new(19.0760, 72.8777, Some(8.5)).unwrap();
        visit.record_location(fix).unwrap();
        assert!(visit.location.is_some());
    }

    #[test]
    fn test_later_fix_overwrites_earlier() {
        let mut visit = make_scheduled();
        let first = GeoFix::new(10.0, 10.0, None).unwrap();
        let second = GeoFix::new(20.0, 20.0, None).unwrap();
        visit.record_location(first).unwrap();
        visit.record_location(second).unwrap();
        assert_eq!(visit.location.unwrap().latitude, 20.0);
    }

    #[test]
    fn test_closed_visit_rejects_location() {
        let mut visit = make_scheduled();
        visit.start(evidence("arrived")).unwrap();
        visit.complete(evidence("done")).unwrap();
        let fix = GeoFix::new(19.0, 72.0, None).unwrap();
        let err = visit.record_location(fix).unwrap_err();
        assert!(matches!(err, InspectionError::LocationRejected(_)));
    }

    // ── Filter/presentation integration ──────────────────────────────

    #[test]
    fn test_facets() {
        let visit = make_scheduled();
        assert_eq!(visit.facet(Facet::Status), Some("scheduled"));
        assert_eq!(visit.facet(Facet::Category), Some("verification"));
        assert_eq!(visit.facet(Facet::Priority), Some("high"));
        assert_eq!(visit.facet(Facet::District), Some("MRP"));
    }

    #[test]
    fn test_row_matches_columns() {
        let visit = make_scheduled();
        assert_eq!(visit.row().len(), InspectionRecord::columns().len());
    }
}
