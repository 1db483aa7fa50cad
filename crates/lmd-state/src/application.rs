//! # Application Lifecycle
//!
//! Models a license application from draft to disposal.
//!
//! ```text
//! Draft ──▶ Submitted ──▶ Scrutiny ──▶ Approved (terminal)
//!               ▲            │
//!               │            ├──▶ Rejected (terminal)
//!               │            │
//!               └── resubmit ┴──▶ Returned
//! ```
//!
//! A returned application goes back to the applicant for revision and
//! re-enters the queue on resubmission. Approval and rejection are final;
//! a fresh application is required afterwards.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use lmd_core::{ApplicationKind, LicenseCategory, Priority, Timestamp};
use lmd_query::{Facet, Filterable, Tabular};

use crate::{TransitionEvidence, TransitionRecord};

// ─── Application State ───────────────────────────────────────────────

/// The lifecycle state of a license application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationState {
    /// Being filled in; not yet in the department's queue.
    Draft,
    /// In the queue, awaiting scrutiny.
    Submitted,
    /// Under scrutiny by the district office.
    Scrutiny,
    /// Approved; a license will be issued (terminal).
    Approved,
    /// Rejected (terminal).
    Rejected,
    /// Returned to the applicant for revision.
    Returned,
}

impl ApplicationState {
    /// Whether this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Submitted => "submitted",
            Self::Scrutiny => "scrutiny",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Returned => "returned",
        }
    }
}

impl std::fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by application lifecycle transitions.
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid application transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// Application has been disposed of.
    #[error("application is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: String,
    },
}

// ─── Application Record ──────────────────────────────────────────────

/// A license application with its lifecycle state and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationRecord {
    pub id: Uuid,
    /// Department file reference, e.g. `"LM-APP-2025-0041"`.
    pub reference: String,
    /// Applicant firm or person.
    pub applicant: String,
    pub kind: ApplicationKind,
    pub category: LicenseCategory,
    /// District code the application was filed in.
    pub district: String,
    pub priority: Priority,
    /// Scrutiny fee in rupees.
    pub fee: u32,
    pub state: ApplicationState,
    pub created_at: Timestamp,
    /// Set on first submission.
    pub submitted_at: Option<Timestamp>,
    /// Ordered log of all state transitions.
    pub transitions: Vec<TransitionRecord<ApplicationState>>,
}

impl ApplicationRecord {
    /// Create a new draft application.
    #[allow(clippy::too_many_arguments)]
    pub fn new_draft(
        reference: String,
        applicant: String,
        kind: ApplicationKind,
        category: LicenseCategory,
        district: String,
        priority: Priority,
        fee: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            reference,
            applicant,
            kind,
            category,
            district,
            priority,
            fee,
            state: ApplicationState::Draft,
            created_at: Timestamp::now(),
            submitted_at: None,
            transitions: Vec::new(),
        }
    }

    /// Submit the draft into the queue (DRAFT → SUBMITTED).
    pub fn submit(&mut self, evidence: TransitionEvidence) -> Result<(), ApplicationError> {
        self.require_state(ApplicationState::Draft, ApplicationState::Submitted)?;
        self.submitted_at = Some(Timestamp::now());
        self.do_transition(ApplicationState::Submitted, evidence);
        Ok(())
    }

    /// Take the application up for scrutiny (SUBMITTED → SCRUTINY).
    pub fn begin_scrutiny(&mut self, evidence: TransitionEvidence) -> Result<(), ApplicationError> {
        self.require_state(ApplicationState::Submitted, ApplicationState::Scrutiny)?;
        self.do_transition(ApplicationState::Scrutiny, evidence);
        Ok(())
    }

    /// Approve the application (SCRUTINY → APPROVED).
    pub fn approve(&mut self, evidence: TransitionEvidence) -> Result<(), ApplicationError> {
        self.require_state(ApplicationState::Scrutiny, ApplicationState::Approved)?;
        self.do_transition(ApplicationState::Approved, evidence);
        Ok(())
    }

    /// Reject the application (SCRUTINY → REJECTED).
    pub fn reject(&mut self, evidence: TransitionEvidence) -> Result<(), ApplicationError> {
        self.require_state(ApplicationState::Scrutiny, ApplicationState::Rejected)?;
        self.do_transition(ApplicationState::Rejected, evidence);
        Ok(())
    }

    /// Return the application for revision (SCRUTINY → RETURNED).
    pub fn return_for_revision(
        &mut self,
        evidence: TransitionEvidence,
    ) -> Result<(), ApplicationError> {
        self.require_state(ApplicationState::Scrutiny, ApplicationState::Returned)?;
        self.do_transition(ApplicationState::Returned, evidence);
        Ok(())
    }

    /// Resubmit a returned application (RETURNED → SUBMITTED).
    pub fn resubmit(&mut self, evidence: TransitionEvidence) -> Result<(), ApplicationError> {
        self.require_state(ApplicationState::Returned, ApplicationState::Submitted)?;
        self.submitted_at = Some(Timestamp::now());
        self.do_transition(ApplicationState::Submitted, evidence);
        Ok(())
    }

    /// Whether the application has been disposed of.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    fn require_state(
        &self,
        expected: ApplicationState,
        target: ApplicationState,
    ) -> Result<(), ApplicationError> {
        if self.state.is_terminal() {
            return Err(ApplicationError::TerminalState {
                state: self.state.to_string(),
            });
        }
        if self.state != expected {
            return Err(ApplicationError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: ApplicationState, evidence: TransitionEvidence) {
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

impl Filterable for ApplicationRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.reference, &self.applicant]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.state.as_str()),
            Facet::Category => Some(self.category.as_str()),
            Facet::Priority => Some(self.priority.as_str()),
            Facet::District => Some(&self.district),
        }
    }
}

impl Tabular for ApplicationRecord {
    fn columns() -> &'static [&'static str] {
        &["Reference", "Applicant", "Kind", "Category", "District", "Priority", "Status"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.reference.clone(),
            self.applicant.clone(),
            self.kind.to_string(),
            self.category.to_string(),
            self.district.clone(),
            self.priority.to_string(),
            self.state.to_string(),
        ]
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(reason: &str) -> TransitionEvidence {
        TransitionEvidence::by(reason, "test-officer")
    }

    fn make_draft() -> ApplicationRecord {
        ApplicationRecord::new_draft(
            "LM-APP-2025-0001".to_string(),
            "Precision Scales Ltd".to_string(),
            ApplicationKind::NewLicense,
            LicenseCategory::Manufacturer,
            "MRP".to_string(),
            Priority::Medium,
            500,
        )
    }

    fn make_under_scrutiny() -> ApplicationRecord {
        let mut app = make_draft();
        app.submit(evidence("filed")).unwrap();
        app.begin_scrutiny(evidence("taken up")).unwrap();
        app
    }

    // ── Happy-path lifecycle tests ───────────────────────────────────

    #[test]
    fn test_new_draft() {
        let app = make_draft();
        assert_eq!(app.state, ApplicationState::Draft);
        assert!(app.submitted_at.is_none());
        assert!(!app.is_terminal());
        assert!(app.transitions.is_empty());
    }

    #[test]
    fn test_submit_sets_submitted_at() {
        let mut app = make_draft();
        app.submit(evidence("filed")).unwrap();
        assert_eq!(app.state, ApplicationState::Submitted);
        assert!(app.submitted_at.is_some());
        assert_eq!(app.transitions.len(), 1);
    }

    #[test]
    fn test_scrutiny_to_approved() {
        let mut app = make_under_scrutiny();
        app.approve(evidence("documents in order")).unwrap();
        assert_eq!(app.state, ApplicationState::Approved);
        assert!(app.is_terminal());
    }

    #[test]
    fn test_scrutiny_to_rejected() {
        let mut app = make_under_scrutiny();
        app.reject(evidence("premises unsuitable")).unwrap();
        assert_eq!(app.state, ApplicationState::Rejected);
        assert!(app.is_terminal());
    }

    #[test]
    fn test_return_and_resubmit_loop() {
        let mut app = make_under_scrutiny();
        app.return_for_revision(evidence("partnership deed missing"))
            .unwrap();
        assert_eq!(app.state, ApplicationState::Returned);
        assert!(!app.is_terminal());

        app.resubmit(evidence("deed attached")).unwrap();
        assert_eq!(app.state, ApplicationState::Submitted);

        app.begin_scrutiny(evidence("second scrutiny")).unwrap();
        app.approve(evidence("in order")).unwrap();
        assert_eq!(app.transitions.len(), 6);
    }

    // ── Invalid transition tests ─────────────────────────────────────

    #[test]
    fn test_cannot_approve_from_draft() {
        let mut app = make_draft();
        assert!(app.approve(evidence("skip the queue")).is_err());
    }

    #[test]
    fn test_cannot_scrutinize_unsubmitted() {
        let mut app = make_draft();
        assert!(app.begin_scrutiny(evidence("eager")).is_err());
    }

    #[test]
    fn test_cannot_resubmit_unless_returned() {
        let mut app = make_draft();
        app.submit(evidence("filed")).unwrap();
        assert!(app.resubmit(evidence("again")).is_err());
    }

    #[test]
    fn test_no_transition_out_of_approved() {
        let mut app = make_under_scrutiny();
        app.approve(evidence("ok")).unwrap();
        let err = app.reject(evidence("changed mind")).unwrap_err();
        assert!(matches!(err, ApplicationError::TerminalState { .. }));
    }

    #[test]
    fn test_no_transition_out_of_rejected() {
        let mut app = make_under_scrutiny();
        app.reject(evidence("no")).unwrap();
        assert!(app.submit(evidence("retry")).is_err());
    }

    #[test]
    fn test_every_accepted_transition_logs_once() {
        let mut app = make_draft();
        app.submit(evidence("filed")).unwrap();
        app.begin_scrutiny(evidence("taken up")).unwrap();
        app.approve(evidence("ok")).unwrap();
        assert_eq!(app.transitions.len(), 3);
        assert_eq!(app.transitions[0].from_state, ApplicationState::Draft);
        assert_eq!(app.transitions[2].to_state, ApplicationState::Approved);
        assert_eq!(app.transitions[2].actor.as_deref(), Some("test-officer"));
    }

    // ── Filter/presentation integration ──────────────────────────────

    #[test]
    fn test_facets_expose_status_category_priority_district() {
        let app = make_draft();
        assert_eq!(app.facet(Facet::Status), Some("draft"));
        assert_eq!(app.facet(Facet::Category), Some("manufacturer"));
        assert_eq!(app.facet(Facet::Priority), Some("medium"));
        assert_eq!(app.facet(Facet::District), Some("MRP"));
    }

    #[test]
    fn test_row_matches_columns() {
        let app = make_draft();
        assert_eq!(app.row().len(), ApplicationRecord::columns().len());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let app = make_under_scrutiny();
        let json = serde_json::to_string(&app).unwrap();
        let parsed: ApplicationRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.state, app.state);
        assert_eq!(parsed.reference, app.reference);
        assert_eq!(parsed.transitions.len(), app.transitions.len());
    }
}
