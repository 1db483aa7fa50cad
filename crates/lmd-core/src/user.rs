//! # Department User Records
//!
//! Staff accounts shown on the user administration screen. Credentials are
//! not stored here — the API layer's configuration owns those; these
//! records carry the directory fields the list renders.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lmd_query::{Facet, Filterable, Tabular};

use crate::domain::Role;
use crate::temporal::Timestamp;

/// One staff account in the department directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Uuid,
    /// Login name, unique across the directory.
    pub username: String,
    pub full_name: String,
    pub role: Role,
    /// District the user is posted to; `None` for headquarters staff.
    pub district: Option<String>,
    /// Disabled accounts stay listed but cannot sign in.
    pub active: bool,
    pub last_login: Option<Timestamp>,
}

impl UserRecord {
    /// The status chip value the directory renders.
    pub fn status_str(&self) -> &'static str {
        if self.active {
            "active"
        } else {
            "disabled"
        }
    }
}

impl Filterable for UserRecord {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.username, &self.full_name]
    }

    fn facet(&self, facet: Facet) -> Option<&str> {
        match facet {
            Facet::Status => Some(self.status_str()),
            Facet::Category => Some(self.role.as_str()),
            Facet::District => self.district.as_deref(),
            Facet::Priority => None,
        }
    }
}

impl Tabular for UserRecord {
    fn columns() -> &'static [&'static str] {
        &["Username", "Name", "Role", "District", "Status", "Last Login"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.username.clone(),
            self.full_name.clone(),
            self.role.to_string(),
            self.district.clone().unwrap_or_else(|| "—".to_string()),
            self.status_str().to_string(),
            self.last_login
                .map(|t| t.to_iso8601())
                .unwrap_or_else(|| "never".to_string()),
        ]
    }
}
