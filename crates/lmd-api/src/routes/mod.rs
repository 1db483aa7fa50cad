//! # API Route Modules
//!
//! One module per console screen:
//!
//! - `auth` — sign-in/sign-out, issuing the session tokens the other
//!   routes require.
//! - `dashboard` — role-gated summary variant assembled live from the
//!   registry stores.
//! - `applications` — license application registry and lifecycle actions.
//! - `licenses` — license registry and lifecycle actions.
//! - `inspections` — inspection roster, lifecycle actions, and field
//!   location capture.
//! - `districts` — district reference data.
//! - `users` — staff directory (admin only).
//!
//! Every list endpoint shares the same query grammar ([`ListParams`]) and
//! response envelope ([`ListResponse`]): the filter → paginate → present
//! pipeline from `lmd-query`, evaluated server-side per request.

pub mod applications;
pub mod auth;
pub mod dashboard;
pub mod districts;
pub mod inspections;
pub mod licenses;
pub mod users;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

use lmd_query::{
    evaluate, facet_filter, tabulate, FilterState, Filterable, TableView, Tabular, ViewMode,
};

/// Query parameters accepted by every list endpoint.
///
/// Categorical parameters accept `all` (any case) or an empty value as the
/// "no filter" sentinel. `page` is 1-based and clamped to 1 at the bottom;
/// a page past the end returns an empty slice. `view` switches between the
/// card projection (`cards`, default) and the tabular grid (`table`).
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListParams {
    /// Free-text query, case-insensitive, matched across display fields.
    pub search: Option<String>,
    /// Exact-match status filter.
    pub status: Option<String>,
    /// Exact-match category filter.
    pub category: Option<String>,
    /// Exact-match priority filter.
    pub priority: Option<String>,
    /// Exact-match district code filter.
    pub district: Option<String>,
    /// Requested page, 1-based.
    pub page: Option<usize>,
    /// Projection: `cards` (default) or `table`.
    pub view: Option<String>,
}

impl ListParams {
    /// Fold the raw query parameters into a [`FilterState`].
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            status: facet_filter(self.status.as_deref()),
            category: facet_filter(self.category.as_deref()),
            priority: facet_filter(self.priority.as_deref()),
            district: facet_filter(self.district.as_deref()),
            page: self.page.unwrap_or(1).max(1),
        }
    }

    /// The requested projection.
    pub fn view_mode(&self) -> ViewMode {
        ViewMode::parse(self.view.as_deref())
    }
}

/// Response envelope shared by every list endpoint.
///
/// Exactly one of `items` (card projection) or `table` (tabular grid) is
/// present, per the `view` parameter. The pager and summary fields are
/// always present.
#[derive(Debug, Serialize)]
pub struct ListResponse<T> {
    /// Card projection: the full records on this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<T>>,
    /// Tabular projection: headers plus one row per record on this page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<TableView>,
    /// Page number served, 1-based.
    pub page: usize,
    /// Total pages for the filtered set.
    pub page_count: usize,
    /// Records in the registry, before filtering.
    pub total: usize,
    /// Records visible under the current filter state.
    pub filtered: usize,
    /// Whether a previous page exists.
    pub has_previous: bool,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Full-set counts grouped by status.
    pub summary: BTreeMap<String, usize>,
}

/// Run the list pipeline over a registry snapshot and shape the response.
pub fn list_response<T>(records: Vec<T>, params: &ListParams, page_size: usize) -> ListResponse<T>
where
    T: Filterable + Tabular + Clone,
{
    let state = params.filter_state();
    let outcome = evaluate(&records, &state, page_size);
    let page = outcome.page;
    let summary = outcome.summary;

    let (items, table) = match params.view_mode() {
        ViewMode::Cards => (Some(page.items), None),
        ViewMode::Table => (None, Some(tabulate(&page.items))),
    };

    ListResponse {
        page: page.number,
        page_count: page.page_count,
        total: summary.total,
        filtered: summary.filtered,
        has_previous: page.number > 1 && page.page_count > 0,
        has_next: page.number < page.page_count,
        items,
        table,
        summary: summary.by_status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lmd_query::Facet;

    #[derive(Debug, Clone)]
    struct Item(&'static str, &'static str);

    impl Filterable for Item {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.0]
        }
        fn facet(&self, facet: Facet) -> Option<&str> {
            matches!(facet, Facet::Status).then_some(self.1)
        }
    }

    impl Tabular for Item {
        fn columns() -> &'static [&'static str] {
            &["Name", "Status"]
        }
        fn row(&self) -> Vec<String> {
            vec![self.0.to_string(), self.1.to_string()]
        }
    }

    fn items() -> Vec<Item> {
        vec![
            Item("alpha", "open"),
            Item("beta", "open"),
            Item("gamma", "closed"),
        ]
    }

    #[test]
    fn filter_state_applies_sentinels_and_clamps_page() {
        let params = ListParams {
            search: Some("  ".into()),
            status: Some("all".into()),
            category: Some("".into()),
            page: Some(0),
            ..ListParams::default()
        };
        let state = params.filter_state();
        assert!(state.is_unfiltered());
        assert_eq!(state.page, 1);
    }

    #[test]
    fn cards_view_carries_items() {
        let response = list_response(items(), &ListParams::default(), 6);
        assert!(response.items.is_some());
        assert!(response.table.is_none());
        assert_eq!(response.total, 3);
        assert_eq!(response.summary.get("open"), Some(&2));
    }

    #[test]
    fn table_view_carries_rows() {
        let params = ListParams {
            view: Some("table".into()),
            ..ListParams::default()
        };
        let response = list_response(items(), &params, 6);
        assert!(response.items.is_none());
        let table = response.table.unwrap();
        assert_eq!(table.rows.len(), 3);
    }

    #[test]
    fn pager_flags_follow_bounds() {
        let params = ListParams {
            page: Some(2),
            ..ListParams::default()
        };
        let response = list_response(items(), &params, 2);
        assert_eq!(response.page_count, 2);
        assert!(response.has_previous);
        assert!(!response.has_next);
    }
}
