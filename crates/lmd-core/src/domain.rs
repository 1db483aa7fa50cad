//! # Domain Vocabulary — Single Source of Truth
//!
//! The enumerated vocabulary of the department's registries. Every filter
//! chip, status badge, and category select in the consoles draws from
//! these enums; each serializes as snake_case and round-trips through
//! `as_str`/`FromStr`.
//!
//! | Enum | Values |
//! |------|--------|
//! | `LicenseCategory` | manufacturer, dealer, repairer, packer, importer |
//! | `ApplicationKind` | new_license, renewal, amendment, duplicate |
//! | `InspectionKind`  | verification, stamping, surprise, complaint |
//! | `Priority`        | low, medium, high, urgent |
//! | `Role`            | inspector, officer, admin |

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::LmdError;

// ─── License Category ────────────────────────────────────────────────

/// The trade a metrology license authorizes.
///
/// The Legal Metrology Act licenses three traditional trades — making,
/// selling, and repairing weighing/measuring instruments — plus the
/// registered packer and importer registrations handled by the same desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LicenseCategory {
    /// Manufacturer of weighing or measuring instruments.
    Manufacturer,
    /// Dealer in weighing or measuring instruments.
    Dealer,
    /// Repairer of weighing or measuring instruments.
    Repairer,
    /// Registered packer of commodities in packaged form.
    Packer,
    /// Registered importer of weighing or measuring instruments.
    Importer,
}

impl LicenseCategory {
    /// All categories in canonical order.
    pub fn all() -> &'static [LicenseCategory] {
        &[
            Self::Manufacturer,
            Self::Dealer,
            Self::Repairer,
            Self::Packer,
            Self::Importer,
        ]
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manufacturer => "manufacturer",
            Self::Dealer => "dealer",
            Self::Repairer => "repairer",
            Self::Packer => "packer",
            Self::Importer => "importer",
        }
    }
}

impl std::fmt::Display for LicenseCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LicenseCategory {
    type Err = LmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manufacturer" => Ok(Self::Manufacturer),
            "dealer" => Ok(Self::Dealer),
            "repairer" => Ok(Self::Repairer),
            "packer" => Ok(Self::Packer),
            "importer" => Ok(Self::Importer),
            other => Err(LmdError::UnknownValue(format!(
                "license category: {other:?}"
            ))),
        }
    }
}

// ─── Application Kind ────────────────────────────────────────────────

/// What an application asks the department to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationKind {
    /// First-time license application.
    NewLicense,
    /// Renewal of an existing license.
    Renewal,
    /// Amendment of license particulars (premises, partners, categories).
    Amendment,
    /// Duplicate copy of a lost or damaged license.
    Duplicate,
}

impl ApplicationKind {
    /// All kinds in canonical order.
    pub fn all() -> &'static [ApplicationKind] {
        &[
            Self::NewLicense,
            Self::Renewal,
            Self::Amendment,
            Self::Duplicate,
        ]
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewLicense => "new_license",
            Self::Renewal => "renewal",
            Self::Amendment => "amendment",
            Self::Duplicate => "duplicate",
        }
    }
}

impl std::fmt::Display for ApplicationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationKind {
    type Err = LmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new_license" => Ok(Self::NewLicense),
            "renewal" => Ok(Self::Renewal),
            "amendment" => Ok(Self::Amendment),
            "duplicate" => Ok(Self::Duplicate),
            other => Err(LmdError::UnknownValue(format!(
                "application kind: {other:?}"
            ))),
        }
    }
}

// ─── Inspection Kind ─────────────────────────────────────────────────

/// Why an inspection visit is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InspectionKind {
    /// Periodic verification of instruments in use.
    Verification,
    /// Stamping of verified instruments.
    Stamping,
    /// Unannounced market surveillance visit.
    Surprise,
    /// Visit triggered by a consumer complaint.
    Complaint,
}

impl InspectionKind {
    /// All kinds in canonical order.
    pub fn all() -> &'static [InspectionKind] {
        &[
            Self::Verification,
            Self::Stamping,
            Self::Surprise,
            Self::Complaint,
        ]
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verification => "verification",
            Self::Stamping => "stamping",
            Self::Surprise => "surprise",
            Self::Complaint => "complaint",
        }
    }
}

impl std::fmt::Display for InspectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InspectionKind {
    type Err = LmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "verification" => Ok(Self::Verification),
            "stamping" => Ok(Self::Stamping),
            "surprise" => Ok(Self::Surprise),
            "complaint" => Ok(Self::Complaint),
            other => Err(LmdError::UnknownValue(format!(
                "inspection kind: {other:?}"
            ))),
        }
    }
}

// ─── Priority ────────────────────────────────────────────────────────

/// Handling priority shown as a chip on applications and inspections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities, lowest first.
    pub fn all() -> &'static [Priority] {
        &[Self::Low, Self::Medium, Self::High, Self::Urgent]
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = LmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            other => Err(LmdError::UnknownValue(format!("priority: {other:?}"))),
        }
    }
}

// ─── Role ────────────────────────────────────────────────────────────

/// Staff roles, ordered by privilege level.
///
/// The `Ord` derivation respects variant declaration order:
/// `Inspector < Officer < Admin`, enabling `>=` comparison for access
/// checks and for picking which dashboard variant a session sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Field inspector: sees and works their own inspection queue.
    Inspector,
    /// District officer: sees the registries of their district.
    Officer,
    /// Department admin: full access, including user administration.
    Admin,
}

impl Role {
    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inspector => "inspector",
            Self::Officer => "officer",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inspector" => Ok(Self::Inspector),
            "officer" => Ok(Self::Officer),
            "admin" => Ok(Self::Admin),
            other => Err(LmdError::UnknownValue(format!("role: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_category_roundtrip() {
        for cat in LicenseCategory::all() {
            let parsed: LicenseCategory = cat.as_str().parse().unwrap();
            assert_eq!(*cat, parsed);
        }
    }

    #[test]
    fn license_category_serde_matches_as_str() {
        for cat in LicenseCategory::all() {
            let json = serde_json::to_string(cat).unwrap();
            assert_eq!(json, format!("\"{}\"", cat.as_str()));
        }
    }

    #[test]
    fn license_category_from_str_invalid() {
        assert!("vendor".parse::<LicenseCategory>().is_err());
        assert!("Manufacturer".parse::<LicenseCategory>().is_err()); // case-sensitive
        assert!("".parse::<LicenseCategory>().is_err());
    }

    #[test]
    fn application_kind_roundtrip() {
        for kind in ApplicationKind::all() {
            assert_eq!(*kind, kind.as_str().parse().unwrap());
        }
    }

    #[test]
    fn inspection_kind_roundtrip() {
        for kind in InspectionKind::all() {
            assert_eq!(*kind, kind.as_str().parse().unwrap());
        }
    }

    #[test]
    fn priority_ordering() {
        assert!(Priority::Low < Priority::Medium);
        assert!(Priority::Medium < Priority::High);
        assert!(Priority::High < Priority::Urgent);
    }

    #[test]
    fn priority_roundtrip() {
        for p in Priority::all() {
            assert_eq!(*p, p.as_str().parse().unwrap());
        }
    }

    #[test]
    fn role_ordering_is_privilege_order() {
        assert!(Role::Inspector < Role::Officer);
        assert!(Role::Officer < Role::Admin);
    }

    #[test]
    fn role_roundtrip() {
        for role in [Role::Inspector, Role::Officer, Role::Admin] {
            assert_eq!(role, role.as_str().parse().unwrap());
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }
}
