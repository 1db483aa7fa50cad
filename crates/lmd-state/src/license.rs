//! # License Lifecycle
//!
//! Models an issued metrology license through its validity period.
//!
//! ```text
//! Issued ──▶ Active ⇄ Suspended
//!              │          │
//!              │          └──▶ Revoked (terminal)
//!              ├──▶ Revoked (terminal)
//!              └──▶ Expired (terminal)
//! ```
//!
//! The same lifecycle applies to every [`LicenseCategory`] — manufacturer,
//! dealer, repairer, packer, importer. Category is metadata; the machine
//! does not branch on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use lmd_core::{LicenseCategory, Timestamp};
use lmd_query::{Facet, Filterable, Tabular};

use crate::{TransitionEvidence, TransitionRecord};

// ─── License State ───────────────────────────────────────────────────

/// The lifecycle state of a license.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseState {
    /// Issued but not yet activated by fee realization.
    Issued,
    /// Valid for the licensed trade.
    Active,
    /// Temporarily suspended.
    Suspended,
    /// Permanently revoked (terminal).
    Revoked,
    /// Validity period ended (terminal).
    Expired,
}

impl LicenseState {
    /// Whether this state accepts no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Revoked | Self::Expired)
    }

    /// Whether the license currently authorizes the trade.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Revoked => "revoked",
            Self::Expired => "expired",
        }
    }
}

impl std::fmt::Display for LicenseState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by license lifecycle transitions.
#[derive(Error, Debug)]
pub enum LicenseError {
    /// Attempted transition is not valid from the current state.
    #[error("invalid license transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state.
        from: String,
        /// Attempted target state.
        to: String,
    },

    /// License is in a terminal state.
    #[error("license is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: String,
    },
}

// ─── License Record ──────────────────────────────────────────────────

/// An issued license with its lifecycle state and transition history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseRecord {
    pub id: Uuid,
    /// License number, e.g. `"LM-MFR-0423"`.
    pub number: String,
    /// The licensed firm or person.
    pub holder: String,
    pub category: LicenseCategory,
    /// District code the license belongs to.
    pub district: String,
    pub state: LicenseState,
    pub issued_at: Timestamp,
    /// End of the current validity period.
    pub valid_until: Timestamp,
    /// Instruments covered by the license schedule.
    pub instrument_count: u32,
    /// Ordered log of all state transitions.
    pub transitions: Vec<TransitionRecord<LicenseState>>,
}

impl LicenseRecord {
    /// Issue a new license.
    pub fn new_issued(
        number: String,
        holder: String,
        category: LicenseCategory,
        district: String,
        valid_until: Timestamp,
        instrument_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            holder,
            category,
            district,
            state: LicenseState::Issued,
            issued_at: Timestamp::now(),
            valid_until,
            instrument_count,
            transitions: Vec::new(),
        }
    }

    /// Activate the license (ISSUED → ACTIVE).
    pub fn activate(&mut self, evidence: TransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Issued, LicenseState::Active)?;
        self.do_transition(LicenseState::Active, evidence);
        Ok(())
    }

    /// Suspend the license (ACTIVE → SUSPENDED).
    pub fn suspend(&mut self, evidence: TransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Active, LicenseState::Suspended)?;
        self.do_transition(LicenseState::Suspended, evidence);
        Ok(())
    }

    /// Reinstate a suspended license (SUSPENDED → ACTIVE).
    pub fn reinstate(&mut self, evidence: TransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Suspended, LicenseState::Active)?;
        self.do_transition(LicenseState::Active, evidence);
        Ok(())
    }

    /// Revoke the license permanently (ACTIVE or SUSPENDED → REVOKED).
    pub fn revoke(&mut self, evidence: TransitionEvidence) -> Result<(), LicenseError> {
        if self.state.is_terminal() {
            return Err(LicenseError::TerminalState {
                state: self.state.to_string(),
            });
        }
        if !matches!(self.state, LicenseState::Active | LicenseState::Suspended) {
            return Err(LicenseError::InvalidTransition {
                from: self.state.to_string(),
                to: LicenseState::Revoked.to_string(),
            });
        }
        self.do_transition(LicenseState::Revoked, evidence);
        Ok(())
    }

    /// Expire the license (ACTIVE → EXPIRED).
    pub fn expire(&mut self, evidence: TransitionEvidence) -> Result<(), LicenseError> {
        self.require_state(LicenseState::Active, LicenseState::Expired)?;
        self.do_transition(LicenseState::Expired, evidence);
        Ok(())
    }

    /// Whether the license currently authorizes the trade.
    pub fn is_valid(&self) -> bool {
        self.state.is_valid()
    }

    /// Whether the license is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    fn require_state(
        &self,
        expected: LicenseState,
        target: LicenseState,
    ) -> Result<(), LicenseError> {
        if self.state.is_terminal() {
            return Err(LicenseError::TerminalState {
                state: self.state.to_string(),
            });
        }
        if self.state != expected {
            return Err(LicenseError::InvalidTransition {
                from: self.state.to_string(),
                to: target.to_string(),
            });
        }
        Ok(())
    }

    fn do_transition(&mut self, to: LicenseState, evidence: TransitionEvidence) {
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

impl Filterable for LicenseRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.number, &self.holder]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.state.as_str()),
            Facet::Category => Some(self.category.as_str()),
            Facet::Priority => None,
            Facet::District => Some(&self.district),
        }
    }
}

impl Tabular for LicenseRecord {
    fn columns() -> &'static [&'static str] {
        &["Number", "Holder", "Category", "District", "Status", "Valid Until", "Instruments"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.number.clone(),
            self.holder.clone(),
            self.category.to_string(),
            self.district.clone(),
            self.state.to_string(),
            self.valid_until.to_iso8601(),
            self.instrument_count.to_string(),
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

    fn make_issued() -> LicenseRecord {
        LicenseRecord::new_issued(
            "LM-MFR-0423".to_string(),
            "Precision Scales Ltd".to_string(),
            LicenseCategory::Manufacturer,
            "MRP".to_string(),
            Timestamp::parse("2026-03-31T23:59:59Z").unwrap(),
            12,
        )
    }

    fn make_active() -> LicenseRecord {
        let mut lic = make_issued();
        lic.activate(evidence("fee realized")).unwrap();
        lic
    }

    #[test]
    fn test_new_issued() {
        let lic = make_issued();
        assert_eq!(lic.state, LicenseState::Issued);
        assert!(!lic.is_valid());
        assert!(!lic.is_terminal());
    }

    #[test]
    fn test_issued_to_active() {
        let lic = make_active();
        assert_eq!(lic.state, LicenseState::Active);
        assert!(lic.is_valid());
    }

    #[test]
    fn test_suspend_and_reinstate() {
        let mut lic = make_active();
        lic.suspend(evidence("verification overdue")).unwrap();
        assert_eq!(lic.state, LicenseState::Suspended);
        assert!(!lic.is_valid());

        lic.reinstate(evidence("verification completed")).unwrap();
        assert_eq!(lic.state, LicenseState::Active);
        assert!(lic.is_valid());
    }

    #[test]
    fn test_revoke_from_active_and_suspended() {
        let mut lic = make_active();
        lic.revoke(evidence("fraudulent stamping")).unwrap();
        assert!(lic.is_terminal());

        let mut lic = make_active();
        lic.suspend(evidence("pending enquiry")).unwrap();
        lic.revoke(evidence("enquiry upheld")).unwrap();
        assert_eq!(lic.state, LicenseState::Revoked);
    }

    #[test]
    fn test_active_to_expired() {
        let mut lic = make_active();
        lic.expire(evidence("validity ended")).unwrap();
        assert_eq!(lic.state, LicenseState::Expired);
        assert!(lic.is_terminal());
    }

    #[test]
    fn test_cannot_suspend_issued() {
        let mut lic = make_issued();
        assert!(lic.suspend(evidence("early")).is_err());
    }

    #[test]
    fn test_cannot_expire_suspended() {
        let mut lic = make_active();
        lic.suspend(evidence("suspended")).unwrap();
        assert!(lic.expire(evidence("expired")).is_err());
    }

    #[test]
    fn test_cannot_revoke_issued() {
        let mut lic = make_issued();
        let err = lic.revoke(evidence("premature")).unwrap_err();
        assert!(matches!(err, LicenseError::InvalidTransition { .. }));
    }

    #[test]
    fn test_terminal_states_are_final() {
        let mut lic = make_active();
        lic.expire(evidence("ended")).unwrap();
        assert!(lic.activate(evidence("again")).is_err());
        assert!(lic.revoke(evidence("too late")).is_err());
    }

    #[test]
    fn test_full_lifecycle_logs_every_step() {
        let mut lic = make_issued();
        lic.activate(evidence("fee realized")).unwrap();
        lic.suspend(evidence("audit")).unwrap();
        lic.reinstate(evidence("audit passed")).unwrap();
        lic.expire(evidence("term ended")).unwrap();
        assert_eq!(lic.transitions.len(), 4);
        assert_eq!(lic.transitions[0].from_state, LicenseState::Issued);
        assert_eq!(lic.transitions[3].to_state, LicenseState::Expired);
    }

    #[test]
    fn test_facets_and_row() {
        let lic = make_active();
        assert_eq!(lic.facet(Facet::Status), Some("active"));
        assert_eq!(lic.facet(Facet::Category), Some("manufacturer"));
        assert_eq!(lic.facet(Facet::Priority), None);
        assert_eq!(lic.row().len(), LicenseRecord::columns().len());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let lic = make_active();
        let json = serde_json::to_string(&lic).unwrap();
        let parsed: LicenseRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.state, lic.state);
        assert_eq!(parsed.number, lic.number);
    }
}
