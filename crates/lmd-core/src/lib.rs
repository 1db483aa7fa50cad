//! # lmd-core — Foundational Types for the Legal Metrology Stack
//!
//! The shared vocabulary of the department: license categories, application
//! kinds, inspection kinds, priorities, staff roles, district reference
//! data, and the UTC-only timestamp used on every record and transition.
//!
//! ## Crate Policy
//!
//! - Single source of truth for every domain enum. Matches on these types
//!   must be exhaustive — adding a variant forces every consumer to handle
//!   it at compile time.
//! - No I/O, no async, no framework types. Everything here is plain data
//!   with serde derives.

pub mod district;
pub mod domain;
pub mod error;
pub mod temporal;
pub mod user;

pub use district::{District, Region};
pub use domain::{ApplicationKind, InspectionKind, LicenseCategory, Priority, Role};
pub use error::LmdError;
pub use temporal::Timestamp;
pub use user::UserRecord;
