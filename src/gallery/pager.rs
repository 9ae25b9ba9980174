//! Page state over the active set
//!
//! Navigation is gated by bounds checks and reports whether the page actually
//! changed, so callers can skip redraws on boundary presses.

use std::num::NonZeroUsize;
use std::ops::Range;

use super::filter::ActiveSet;
use crate::state::data::Record;

/// Talks shown per page
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(40) {
    Some(size) => size,
    None => unreachable!(),
};

/// Current page over an active set of `total` records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    /// 1-based, always within 1..=page_count()
    current_page: usize,
    page_size: NonZeroUsize,
    total: usize,
}

impl Pager {
    /// Start on page 1 of a set of `total` records
    pub fn with_total(page_size: NonZeroUsize, total: usize) -> Self {
        Self {
            current_page: 1,
            page_size,
            total,
        }
    }

    /// Track a new active set length, pulling the page back into range
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.current_page = self.current_page.clamp(1, self.page_count());
    }

    pub fn page_size(&self) -> usize {
        self.page_size.get()
    }

    /// Never below 1, so an empty set still renders as "page 1 of 1"
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size.get()).max(1)
    }

    pub fn page_number(&self) -> usize {
        self.current_page
    }

    /// Index range of the current page, clipped to the total
    pub fn page_range(&self) -> Range<usize> {
        let size = self.page_size.get();
        let start = ((self.current_page - 1) * size).min(self.total);
        let end = (self.current_page * size).min(self.total);
        start..end
    }

    pub fn current_slice<'a>(&self, active: &'a ActiveSet) -> Vec<&'a Record> {
        debug_assert_eq!(active.len(), self.total, "pager total out of sync with active set");
        active.slice(self.page_range())
    }

    pub fn forward(&mut self) -> bool {
        if self.current_page < self.page_count() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    pub fn backward(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    pub fn controls(&self) -> PaginationControls {
        PaginationControls::new(self.page_number(), self.page_count())
    }
}

/// Navigation affordances derived from the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub page_number: usize,
    pub page_count: usize,
    pub show_left: bool,
    pub show_right: bool,
}

impl PaginationControls {
    pub fn new(page_number: usize, page_count: usize) -> Self {
        let paged = page_count > 1;
        Self {
            page_number,
            page_count,
            show_left: paged && page_number > 1,
            show_right: paged && page_number < page_count,
        }
    }

    /// The whole bar is hidden for a single page
    pub fn visible(&self) -> bool {
        self.page_count > 1
    }
}

impl Default for PaginationControls {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::filter::DatasetFilter;
    use crate::state::data::LocalizedText;
    use std::sync::Arc;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn active_set(len: usize) -> ActiveSet {
        let records: Vec<Record> = (0..len)
            .map(|i| Record {
                id: i.to_string(),
                slug: format!("talk-{i}"),
                speaker: String::new(),
                titles: vec![LocalizedText::new("default", format!("Title {i}"))],
                descriptions: Vec::new(),
                languages: vec!["en".into()],
            })
            .collect();
        DatasetFilter::new(Arc::from(records)).apply(None)
    }

    #[test]
    fn test_page_count_is_at_least_one() {
        for total in [0, 1, 39, 40, 41, 80, 81, 1000] {
            for page_size in [1, 7, 40, 100] {
                let pager = Pager::with_total(size(page_size), total);
                assert!(pager.page_count() >= 1);
                assert_eq!(pager.page_count(), total.div_ceil(page_size).max(1));
            }
        }
    }

    #[test]
    fn test_eighty_five_records_make_three_pages() {
        let active = active_set(85);
        let mut pager = Pager::with_total(DEFAULT_PAGE_SIZE, active.len());
        assert_eq!(pager.page_count(), 3);

        assert_eq!(pager.current_slice(&active).len(), 40);
        assert!(pager.forward());
        assert_eq!(pager.current_slice(&active).len(), 40);
        assert_eq!(pager.current_slice(&active)[0].id, "40");
        assert!(pager.forward());
        let last = pager.current_slice(&active);
        assert_eq!(last.len(), 5);
        assert_eq!(last[4].id, "84");
    }

    #[test]
    fn test_empty_set_is_a_valid_single_page() {
        let active = active_set(0);
        let mut pager = Pager::with_total(DEFAULT_PAGE_SIZE, active.len());
        assert_eq!(pager.page_count(), 1);
        assert!(pager.current_slice(&active).is_empty());
        assert!(!pager.forward());
        assert!(!pager.backward());
        assert_eq!(pager.page_number(), 1);
    }

    #[test]
    fn test_forward_reaches_last_page_then_stops() {
        let mut pager = Pager::with_total(size(10), 95);
        let count = pager.page_count();
        for _ in 0..count - 1 {
            assert!(pager.forward());
        }
        assert_eq!(pager.page_number(), count);
        assert!(!pager.forward());
        assert_eq!(pager.page_number(), count);
    }

    #[test]
    fn test_backward_from_first_page_is_noop() {
        let mut pager = Pager::with_total(size(10), 95);
        assert!(!pager.backward());
        assert_eq!(pager.page_number(), 1);
        pager.forward();
        assert!(pager.backward());
        assert_eq!(pager.page_number(), 1);
    }

    #[test]
    fn test_reset_always_returns_to_first_page() {
        let mut pager = Pager::with_total(size(10), 95);
        pager.reset();
        assert_eq!(pager.page_number(), 1);
        while pager.forward() {}
        pager.reset();
        assert_eq!(pager.page_number(), 1);
    }

    #[test]
    fn test_shrinking_total_clamps_page() {
        let mut pager = Pager::with_total(size(40), 100);
        pager.forward();
        pager.forward();
        assert_eq!(pager.page_number(), 3);
        pager.set_total(12);
        assert_eq!(pager.page_number(), 1);
        assert_eq!(pager.page_range(), 0..12);
    }

    #[test]
    fn test_controls_policy() {
        assert_eq!(
            PaginationControls::new(1, 1),
            PaginationControls { page_number: 1, page_count: 1, show_left: false, show_right: false }
        );
        assert!(!PaginationControls::new(1, 1).visible());

        let first = PaginationControls::new(1, 3);
        assert!(!first.show_left && first.show_right && first.visible());

        let middle = PaginationControls::new(2, 3);
        assert!(middle.show_left && middle.show_right);

        let last = PaginationControls::new(3, 3);
        assert!(last.show_left && !last.show_right);
    }

    #[test]
    fn test_controls_follow_pager() {
        let mut pager = Pager::with_total(size(40), 85);
        assert_eq!(pager.controls(), PaginationControls::new(1, 3));
        pager.forward();
        assert_eq!(pager.controls().page_number, 2);
    }
}
