//! # lmd-query — Filterable Record List Pipeline
//!
//! The one structural pattern that recurs on every list-bearing screen of
//! the department consoles: a store of flat records is narrowed by a set of
//! independent predicates, sliced into fixed-size pages, and projected as
//! either a card list or a tabular grid, with summary counts alongside.
//!
//! This crate keeps that pipeline pure and synchronous. Filter state is one
//! immutable configuration value ([`FilterState`]), not scattered variables,
//! so `records × state → page` is a plain function that can be tested
//! exhaustively and property-checked.
//!
//! ```text
//! records ──filter──▶ visible ──paginate──▶ slice ──project──▶ cards | table
//!                        │
//!                        └──────────▶ summary counts
//! ```
//!
//! ## Pipeline Laws
//!
//! - The visible set is always a subset of the input set.
//! - An all-sentinel filter returns the input unchanged, in order.
//! - Concatenating every page in order reproduces the visible sequence
//!   exactly once per record.
//! - `page_count == ceil(visible / page_size)`.

pub mod filter;
pub mod page;
pub mod present;

pub use filter::{facet_filter, matches, Facet, FilterState, Filterable};
pub use page::{paginate, Page, DEFAULT_PAGE_SIZE};
pub use present::{summarize, tabulate, StatusSummary, TableView, Tabular, ViewMode};

/// Result of one full pipeline evaluation: the requested page of visible
/// records plus the summary counts derived from the same pass.
#[derive(Debug, Clone)]
pub struct ListOutcome<R> {
    /// The requested slice of the filtered sequence.
    pub page: Page<R>,
    /// Counts over the full and filtered sets.
    pub summary: StatusSummary,
}

/// Evaluate the full filter → paginate pipeline over `records`.
///
/// Input order is preserved: the filtered sequence keeps the records in
/// their store order, and pages slice that sequence without reordering.
/// `state.page` is 1-based; a page past the end yields an empty slice
/// (the "no results" rendering), never an error.
pub fn evaluate<R: Filterable + Clone>(
    records: &[R],
    state: &FilterState,
    page_size: usize,
) -> ListOutcome<R> {
    let visible: Vec<R> = records
        .iter()
        .filter(|r| matches(*r, state))
        .cloned()
        .collect();

    let summary = summarize(records, &visible);
    let page = paginate(visible, state.page, page_size);

    ListOutcome { page, summary }
}
