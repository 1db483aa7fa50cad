//! # Pagination Stage
//!
//! Slices the filtered sequence into fixed-size pages. Page numbers are
//! 1-based; the total page count is ceiling division. Out-of-range pages
//! yield an empty slice rather than an error — the consoles disable the
//! Previous/Next controls at the bounds instead of surfacing failures.

use serde::Serialize;

/// The page size observed across every list view of the consoles.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// One slice of a filtered sequence, with enough context to render the
/// pager controls.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Records on this page, in sequence order.
    pub items: Vec<T>,
    /// The requested page number, 1-based.
    pub number: usize,
    /// Total pages: `ceil(total / page_size)`; 0 when the sequence is empty.
    pub page_count: usize,
    /// Length of the filtered sequence before slicing.
    pub total: usize,
    /// Slice size used.
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Whether a previous page exists (drives the Previous control).
    pub fn has_previous(&self) -> bool {
        self.number > 1 && self.page_count > 0
    }

    /// Whether a next page exists (drives the Next control).
    pub fn has_next(&self) -> bool {
        self.number < self.page_count
    }
}

/// Slice `items` to the requested 1-based page.
///
/// Callers clamp the page number at the lower bound (`page.max(1)`); a
/// number past the last page returns an empty `items` with the counts
/// intact, which renders as the "no results" state.
pub fn paginate<T>(items: Vec<T>, number: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let number = number.max(1);
    let total = items.len();
    let page_count = total.div_ceil(page_size);

    let start = (number - 1).saturating_mul(page_size);
    let slice: Vec<T> = items.into_iter().skip(start).take(page_size).collect();

    Page {
        items: slice,
        number,
        page_count,
        total,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(n: usize) -> Vec<usize> {
        (1..=n).collect()
    }

    #[test]
    fn twelve_records_page_size_six_two_pages() {
        let p1 = paginate(seq(12), 1, 6);
        assert_eq!(p1.page_count, 2);
        assert_eq!(p1.items, vec![1, 2, 3, 4, 5, 6]);
        assert!(!p1.has_previous());
        assert!(p1.has_next());

        let p2 = paginate(seq(12), 2, 6);
        assert_eq!(p2.items, vec![7, 8, 9, 10, 11, 12]);
        assert!(p2.has_previous());
        assert!(!p2.has_next());
    }

    #[test]
    fn partial_last_page() {
        let p = paginate(seq(13), 3, 6);
        assert_eq!(p.page_count, 3);
        assert_eq!(p.items, vec![13]);
        assert!(p.items.len() <= p.page_size);
    }

    #[test]
    fn page_count_is_ceiling_division() {
        assert_eq!(paginate(seq(0), 1, 6).page_count, 0);
        assert_eq!(paginate(seq(1), 1, 6).page_count, 1);
        assert_eq!(paginate(seq(6), 1, 6).page_count, 1);
        assert_eq!(paginate(seq(7), 1, 6).page_count, 2);
    }

    #[test]
    fn empty_sequence_has_no_pages() {
        let p = paginate(Vec::<usize>::new(), 1, 6);
        assert!(p.items.is_empty());
        assert_eq!(p.page_count, 0);
        assert_eq!(p.total, 0);
        assert!(!p.has_previous());
        assert!(!p.has_next());
    }

    #[test]
    fn page_beyond_last_is_empty_not_an_error() {
        let p = paginate(seq(12), 5, 6);
        assert!(p.items.is_empty());
        assert_eq!(p.page_count, 2);
        assert_eq!(p.total, 12);
        assert!(!p.has_next());
    }

    #[test]
    fn page_zero_is_treated_as_first() {
        let p = paginate(seq(12), 0, 6);
        assert_eq!(p.number, 1);
        assert_eq!(p.items, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn concatenated_pages_reproduce_the_sequence() {
        let all = seq(25);
        let page_count = paginate(all.clone(), 1, 6).page_count;
        let mut rebuilt = Vec::new();
        for n in 1..=page_count {
            rebuilt.extend(paginate(all.clone(), n, 6).items);
        }
        assert_eq!(rebuilt, all);
    }

    #[test]
    fn zero_page_size_is_clamped() {
        let p = paginate(seq(3), 1, 0);
        assert_eq!(p.page_size, 1);
        assert_eq!(p.page_count, 3);
        assert_eq!(p.items, vec![1]);
    }
}
