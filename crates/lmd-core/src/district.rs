//! # District Reference Data
//!
//! Districts are the department's administrative partitions. The district
//! registry is static reference data: code, name, region, headquarters,
//! and the small metrics the district cards display.

use serde::{Deserialize, Serialize};

use lmd_query::{Facet, Filterable, Tabular};

use crate::error::LmdError;

/// Administrative region a district belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    North,
    South,
    East,
    West,
    Central,
}

impl Region {
    /// All regions in canonical order.
    pub fn all() -> &'static [Region] {
        &[
            Self::North,
            Self::South,
            Self::East,
            Self::West,
            Self::Central,
        ]
    }

    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Central => "central",
        }
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Region {
    type Err = LmdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            "central" => Ok(Self::Central),
            other => Err(LmdError::UnknownValue(format!("region: {other:?}"))),
        }
    }
}

/// One district of the department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
    /// Short unique code, e.g. `"MRP"`.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Region the district belongs to.
    pub region: Region,
    /// Seat of the district office.
    pub headquarters: String,
    /// Sanctioned inspecting officers.
    pub officers: u32,
    /// Licenses currently active in the district.
    pub active_licenses: u32,
}

impl Filterable for District {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.code, &self.name, &self.headquarters]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            // The district screen's region select rides the category facet.
            Facet::Category => Some(self.region.as_str()),
            Facet::District => Some(&self.code),
            Facet::Status | Facet::Priority => None,
        }
    }
}

impl Tabular for District {
    fn columns() -> &'static [&'static str] {
        &["Code", "Name", "Region", "Headquarters", "Officers", "Active Licenses"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            self.region.to_string(),
            self.headquarters.clone(),
            self.officers.to_string(),
            self.active_licenses.to_string(),
        ]
    }
}
