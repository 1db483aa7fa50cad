//! # Presentation Stage
//!
//! The same filtered/paginated slice renders as either a card list or a
//! tabular grid, chosen by a view-mode toggle the user flips per screen.
//! Both projections are rendering concerns only: no reordering, no data
//! transformation beyond formatting cells as strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::filter::{Facet, Filterable};

/// The two renderings of a record slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Card list: full records, one card per record.
    #[default]
    Cards,
    /// Tabular grid: column headers plus one row of cells per record.
    Table,
}

impl ViewMode {
    /// Parse a view-mode selection; unknown or absent values fall back to
    /// the card view, matching the consoles' default toggle position.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("table") => Self::Table,
            _ => Self::Cards,
        }
    }
}

/// A record that can render as one row of the tabular grid.
pub trait Tabular {
    /// Column headers, in display order.
    fn columns() -> &'static [&'static str];

    /// Cell values for this record, matching [`Tabular::columns`] in
    /// length and order.
    fn row(&self) -> Vec<String>;
}

/// The tabular projection of a record slice.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    /// Column headers.
    pub columns: Vec<&'static str>,
    /// One row of cell strings per record, slice order preserved.
    pub rows: Vec<Vec<String>>,
}

/// Project a slice of records into the tabular grid.
pub fn tabulate<T: Tabular>(items: &[T]) -> TableView {
    TableView {
        columns: T::columns().to_vec(),
        rows: items.iter().map(Tabular::row).collect(),
    }
}

/// Summary counts rendered above every list: the full-set total, the size
/// of the filtered set, and a by-status breakdown of the full set. The
/// map is ordered so the chips render in a stable order.
#[derive(Debug, Clone, Serialize)]
pub struct StatusSummary {
    /// Records in the store, before filtering.
    pub total: usize,
    /// Records visible under the current filter state.
    pub filtered: usize,
    /// Full-set counts grouped by status value.
    pub by_status: BTreeMap<String, usize>,
}

/// Derive summary counts from the full set and the filtered set.
pub fn summarize<R: Filterable>(all: &[R], visible: &[R]) -> StatusSummary {
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();
    for record in all {
        if let Some(status) = record.facet(Facet::Status) {
            *by_status.entry(status.to_string()).or_default() += 1;
        }
    }
    StatusSummary {
        total: all.len(),
        filtered: visible.len(),
        by_status,
    }
}
