//! UI controller for the gallery
//!
//! Owns the dataset filter, the active set and the pager. A controller only
//! exists once the dataset is loaded, so every filter or page operation runs
//! against real data.

use std::num::NonZeroUsize;
use std::sync::Arc;

use tracing::debug;

use crate::gallery::{normalize_language, ActiveSet, DatasetFilter, Pager};
use crate::render::ViewRenderer;
use crate::state::data::Record;

#[derive(Debug, Clone)]
pub struct GalleryController {
    filter: DatasetFilter,
    active: ActiveSet,
    pager: Pager,
}

impl GalleryController {
    /// Start unfiltered on page 1
    pub fn new(dataset: Arc<[Record]>, page_size: NonZeroUsize) -> Self {
        let filter = DatasetFilter::new(dataset);
        let active = filter.apply(None);
        let pager = Pager::with_total(page_size, active.len());
        Self {
            filter,
            active,
            pager,
        }
    }

    pub fn active(&self) -> &ActiveSet {
        &self.active
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn selected_language(&self) -> Option<&str> {
        self.active.language()
    }

    /// Swap the language filter without drawing (used before the first render)
    pub fn select_language(&mut self, language: Option<&str>) {
        self.active = self.filter.apply(normalize_language(language));
        self.pager.set_total(self.active.len());
        self.pager.reset();
        debug!(
            language = self.active.language().unwrap_or("all"),
            talks = self.active.len(),
            pages = self.pager.page_count(),
            "Language filter applied"
        );
    }

    /// Step forward until `page` is current, without drawing.
    /// Returns false (stopping on the last page) when `page` does not exist.
    pub fn seek(&mut self, page: usize) -> bool {
        while self.pager.page_number() < page {
            if !self.pager.forward() {
                return false;
            }
        }
        page >= 1 && self.pager.page_number() == page
    }

    /// Filter change: recompute the active set, go back to page 1, redraw
    pub fn on_filter_changed(&mut self, language: Option<&str>, view: &mut dyn ViewRenderer) {
        self.select_language(language);
        self.render(view);
    }

    /// Next page; draws only when the page changed
    pub fn on_forward(&mut self, view: &mut dyn ViewRenderer) -> bool {
        let moved = self.pager.forward();
        debug!(moved, page = self.pager.page_number(), "Page forward");
        if moved {
            self.render(view);
        }
        moved
    }

    /// Previous page; draws only when the page changed
    pub fn on_back(&mut self, view: &mut dyn ViewRenderer) -> bool {
        let moved = self.pager.backward();
        debug!(moved, page = self.pager.page_number(), "Page back");
        if moved {
            self.render(view);
        }
        moved
    }

    /// Emit the current page and pagination state
    pub fn render(&self, view: &mut dyn ViewRenderer) {
        let slice = self.pager.current_slice(&self.active);
        view.render(&slice, self.active.language());
        view.render_pagination_controls(&self.pager.controls());
    }
}
