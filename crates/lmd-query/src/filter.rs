//! # Filter State & Predicate Set
//!
//! One immutable configuration value per evaluation. Each field is an
//! independent predicate; active predicates combine by logical AND. The
//! free-text predicate is a case-insensitive substring match, OR'd across
//! a record's searchable fields. Categorical predicates are exact string
//! equality with `None` meaning "accept all".
//!
//! Records expose their searchable text and facet values through the
//! [`Filterable`] trait; absence of a facet value on an actively filtered
//! facet is a non-match.

use serde::{Deserialize, Serialize};

/// The categorical facets a record may expose for exact-match filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facet {
    /// Lifecycle or activity status chip.
    Status,
    /// Domain category (license category, inspection kind, region).
    Category,
    /// Handling priority.
    Priority,
    /// Owning district code.
    District,
}

/// A record that can pass through the list pipeline.
pub trait Filterable {
    /// The string fields the free-text predicate searches (OR across them).
    fn search_fields(&self) -> Vec<&str>;

    /// The record's value for a facet, or `None` when it has no such value.
    /// A record returning `None` for an actively filtered facet is hidden.
    fn facet(&self, facet: Facet) -> Option<&str>;
}

/// The complete filter configuration for one evaluation of the pipeline.
///
/// `None` in any categorical field is the "no filter" sentinel. `page` is
/// 1-based. The struct is plain data: building a new one per user input
/// event and re-running [`crate::evaluate`] is the whole update model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    /// Free-text query; case-insensitive substring over search fields.
    pub search: Option<String>,
    /// Exact-match status filter.
    pub status: Option<String>,
    /// Exact-match category filter.
    pub category: Option<String>,
    /// Exact-match priority filter.
    pub priority: Option<String>,
    /// Exact-match district filter.
    pub district: Option<String>,
    /// Requested page, 1-based.
    pub page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            category: None,
            priority: None,
            district: None,
            page: 1,
        }
    }
}

impl FilterState {
    /// Whether any predicate is active.
    pub fn is_unfiltered(&self) -> bool {
        self.search.is_none()
            && self.status.is_none()
            && self.category.is_none()
            && self.priority.is_none()
            && self.district.is_none()
    }
}

/// Normalize a raw categorical selection into a filter value.
///
/// The consoles use `"all"` (any case) and the empty string as the
/// "no filter" sentinel in their select controls; both map to `None`.
pub fn facet_filter(raw: Option<&str>) -> Option<String> {
    match raw {
        None => None,
        Some(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

/// Evaluate every active predicate against one record.
pub fn matches<R: Filterable>(record: &R, state: &FilterState) -> bool {
    if let Some(ref query) = state.search {
        let needle = query.to_lowercase();
        // An all-whitespace query behaves like no query.
        if !needle.trim().is_empty() {
            let hit = record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(needle.trim()));
            if !hit {
                return false;
            }
        }
    }

    facet_matches(record, Facet::Status, state.status.as_deref())
        && facet_matches(record, Facet::Category, state.category.as_deref())
        && facet_matches(record, Facet::Priority, state.priority.as_deref())
        && facet_matches(record, Facet::District, state.district.as_deref())
}

fn facet_matches<R: Filterable>(record: &R, facet: Facet, wanted: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(value) => record.facet(facet) == Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Rec {
        name: &'static str,
        firm: &'static str,
        status: Option<&'static str>,
        category: Option<&'static str>,
    }

    impl Filterable for Rec {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.name, self.firm]
        }

        fn facet(&self, facet: Facet) -> Option<&str> {
            match facet {
                Facet::Status => self.status,
                Facet::Category => self.category,
                _ => None,
            }
        }
    }

    const REC: Rec = Rec {
        name: "Precision Scales Ltd",
        firm: "Meerpur Weighbridge",
        status: Some("active"),
        category: Some("manufacturer"),
    };

    #[test]
    fn empty_state_matches_everything() {
        assert!(matches(&REC, &FilterState::default()));
        assert!(FilterState::default().is_unfiltered());
    }

    #[test]
    fn text_match_is_case_insensitive_substring() {
        let state = FilterState {
            search: Some("PRECISION".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&REC, &state));

        let state = FilterState {
            search: Some("scales ltd".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&REC, &state));
    }

    #[test]
    fn text_match_ors_across_fields() {
        // Hits the second search field only.
        let state = FilterState {
            search: Some("weighbridge".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&REC, &state));
    }

    #[test]
    fn text_miss_hides_record() {
        let state = FilterState {
            search: Some("verification van".to_string()),
            ..FilterState::default()
        };
        assert!(!matches(&REC, &state));
    }

    #[test]
    fn whitespace_only_query_is_ignored() {
        let state = FilterState {
            search: Some("   ".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&REC, &state));
    }

    #[test]
    fn categorical_is_exact_equality() {
        let state = FilterState {
            status: Some("active".to_string()),
            ..FilterState::default()
        };
        assert!(matches(&REC, &state));

        let state = FilterState {
            status: Some("act".to_string()),
            ..FilterState::default()
        };
        assert!(!matches(&REC, &state), "prefix must not match");
    }

    #[test]
    fn predicates_combine_by_and() {
        let state = FilterState {
            search: Some("precision".to_string()),
            status: Some("active".to_string()),
            category: Some("dealer".to_string()),
            ..FilterState::default()
        };
        assert!(!matches(&REC, &state), "one failing predicate hides the record");
    }

    #[test]
    fn missing_facet_value_is_a_non_match() {
        let state = FilterState {
            priority: Some("high".to_string()),
            ..FilterState::default()
        };
        assert!(!matches(&REC, &state));
    }

    #[test]
    fn facet_filter_sentinels_map_to_none() {
        assert_eq!(facet_filter(None), None);
        assert_eq!(facet_filter(Some("")), None);
        assert_eq!(facet_filter(Some("  ")), None);
        assert_eq!(facet_filter(Some("all")), None);
        assert_eq!(facet_filter(Some("All")), None);
        assert_eq!(facet_filter(Some("ALL")), None);
        assert_eq!(facet_filter(Some("active")), Some("active".to_string()));
        assert_eq!(facet_filter(Some(" active ")), Some("active".to_string()));
    }
}
