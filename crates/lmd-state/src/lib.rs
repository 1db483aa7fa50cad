//! # lmd-state — Registry Lifecycle State Machines
//!
//! Models the lifecycles behind the status chips of the department's three
//! working registries:
//!
//! - [`application`] — license applications, from draft through approval
//!   or rejection (with a return-for-revision loop).
//! - [`license`] — issued licenses, from issue through expiry or
//!   revocation (with a suspension/reinstatement loop).
//! - [`inspection`] — inspection visits, from scheduling through
//!   completion or cancellation, including field location capture.
//!
//! Each record enforces its valid transitions with structured errors and
//! appends a [`TransitionRecord`] per accepted transition. Terminal states
//! accept no further transitions.

pub mod application;
pub mod inspection;
pub mod license;

use serde::{Deserialize, Serialize};

use lmd_core::Timestamp;

pub use application::{ApplicationError, ApplicationRecord, ApplicationState};
pub use inspection::{GeoFix, InspectionError, InspectionRecord, InspectionState};
pub use license::{LicenseError, LicenseRecord, LicenseState};

/// Context for a lifecycle transition: who did it and why.
#[derive(Debug, Clone)]
pub struct TransitionEvidence {
    /// Reason for the transition.
    pub reason: String,
    /// Username of the acting officer, if known.
    pub actor: Option<String>,
}

impl TransitionEvidence {
    /// Build evidence with a reason and no actor.
    pub fn reason(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            actor: None,
        }
    }

    /// Build evidence with a reason and an acting officer.
    pub fn by(reason: impl Into<String>, actor: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            actor: Some(actor.into()),
        }
    }
}

/// One entry in a record's transition log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord<S> {
    /// State before the transition.
    pub from_state: S,
    /// State after the transition.
    pub to_state: S,
    /// When the transition occurred.
    pub at: Timestamp,
    /// Acting officer, if recorded.
    pub actor: Option<String>,
    /// Reason for the transition.
    pub reason: String,
}
