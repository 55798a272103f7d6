// Job list engine: filter -> sort -> paginate over an in-memory job list.

pub mod chips;
pub mod filter;
pub mod pagination;
pub mod sort;

use std::sync::Arc;

use serde::Serialize;

use crate::clock::Clock;
use crate::models::job::Job;

use self::chips::{ActiveFilter, FilterChip};
use self::filter::{FilterPatch, FilterState};
use self::pagination::{PageControls, page_range, total_pages};
use self::sort::SortKey;

/// The slice of jobs on the current page plus pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisiblePage {
    pub jobs: Vec<Job>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
}

/// Per-view job list state.
///
/// Owns the loaded jobs and derives the filtered and sorted views from them
/// without ever touching the source records. No operation fails: missing job
/// fields fall back to neutral defaults and out-of-range pages are ignored.
pub struct JobListEngine {
    source: Vec<Job>,
    /// Indices into `source` that pass the filters, in backend order.
    filtered: Vec<usize>,
    /// `filtered` reordered by `sort`.
    ordered: Vec<usize>,
    filters: FilterState,
    sort: SortKey,
    current_page: usize,
    clock: Arc<dyn Clock>,
}

impl JobListEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            source: Vec::new(),
            filtered: Vec::new(),
            ordered: Vec::new(),
            filters: FilterState::default(),
            sort: SortKey::default(),
            current_page: 1,
            clock,
        }
    }

    /// Replace the loaded jobs and go back to page 1.
    ///
    /// Derived views are cleared, not rebuilt: the visible page stays empty
    /// until [`recompute`](Self::recompute) runs.
    pub fn load(&mut self, jobs: impl IntoIterator<Item = Job>) {
        self.source = jobs.into_iter().collect();
        self.filtered.clear();
        self.ordered.clear();
        self.current_page = 1;
        tracing::debug!(jobs = self.source.len(), "Loaded job list");
    }

    /// Re-run the filters and the active sort over the loaded jobs.
    pub fn recompute(&mut self) {
        self.filtered = if self.filters.is_empty() {
            (0..self.source.len()).collect()
        } else {
            let filter = self.filters.compile(self.clock.now());
            self.source
                .iter()
                .enumerate()
                .filter(|(_, job)| filter.matches(job))
                .map(|(index, _)| index)
                .collect()
        };
        self.ordered = self.sort.order(&self.source, &self.filtered);
        self.current_page = self.current_page.min(self.total_pages());
        tracing::debug!(
            loaded = self.source.len(),
            matched = self.filtered.len(),
            "Recomputed job list"
        );
    }

    /// Merge `patch` into the filters, go back to page 1 and recompute.
    pub fn set_filter(&mut self, patch: FilterPatch) {
        self.filters.merge(patch);
        self.current_page = 1;
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.filters = FilterState::default();
        self.current_page = 1;
        self.recompute();
    }

    /// Drop a single active-filter value, go back to page 1 and recompute.
    pub fn remove_filter(&mut self, chip: &FilterChip) {
        if !self.filters.remove(chip) {
            tracing::debug!(?chip, "Removed filter was not active");
        }
        self.current_page = 1;
        self.recompute();
    }

    /// Reorder the filtered jobs. Keeps the current page.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort = key;
        self.ordered = key.order(&self.source, &self.filtered);
    }

    /// Move to `page`; requests outside `1..=total_pages` are ignored.
    pub fn go_to_page(&mut self, page: usize) {
        if (1..=self.total_pages()).contains(&page) {
            self.current_page = page;
        } else {
            tracing::debug!(
                page,
                total_pages = self.total_pages(),
                "Ignoring out-of-range page"
            );
        }
    }

    pub fn visible_page(&self) -> VisiblePage {
        let range = page_range(self.current_page, self.ordered.len());
        VisiblePage {
            jobs: self.ordered[range]
                .iter()
                .map(|&index| self.source[index].clone())
                .collect(),
            total_count: self.total_count(),
            total_pages: self.total_pages(),
            current_page: self.current_page,
        }
    }

    pub fn page_controls(&self) -> Option<PageControls> {
        PageControls::new(self.current_page, self.total_pages())
    }

    pub fn active_filters(&self) -> Vec<ActiveFilter> {
        self.filters.active_filters()
    }

    /// Look up a loaded job by id, whether or not it passes the filters.
    pub fn find(&self, id: i64) -> Option<&Job> {
        self.source.iter().find(|job| job.id == id)
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// Number of jobs passing the filters.
    pub fn total_count(&self) -> usize {
        self.ordered.len()
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_count())
    }

    /// Number of loaded jobs, before filtering.
    pub fn loaded_count(&self) -> usize {
        self.source.len()
    }
}
