use std::ops::Range;

use serde::Serialize;

/// Jobs per page.
pub const PAGE_SIZE: usize = 12;

/// Page numbers shown at once in the page controls.
const MAX_VISIBLE: usize = 5;

/// Page count for `total` items; an empty list is still one (empty) page.
pub fn total_pages(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

/// Index range of `page` (1-indexed) within `total` items.
pub fn page_range(page: usize, total: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(PAGE_SIZE).min(total);
    let end = start.saturating_add(PAGE_SIZE).min(total);
    start..end
}

/// Layout of the pagination widget around the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControls {
    pub current_page: usize,
    pub total_pages: usize,
    /// Consecutive window of page numbers around the current page.
    pub pages: Vec<usize>,
    /// Shortcut to page 1 when the window does not start there.
    pub first: Option<usize>,
    pub leading_ellipsis: bool,
    pub trailing_ellipsis: bool,
    /// Shortcut to the last page when the window does not reach it.
    pub last: Option<usize>,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageControls {
    /// `None` when everything fits on a single page.
    pub fn new(current_page: usize, total_pages: usize) -> Option<Self> {
        if total_pages <= 1 {
            return None;
        }

        let mut start = current_page.saturating_sub(MAX_VISIBLE / 2).max(1);
        let end = (start + MAX_VISIBLE - 1).min(total_pages);
        if end - start < MAX_VISIBLE - 1 {
            start = (end + 1).saturating_sub(MAX_VISIBLE).max(1);
        }

        Some(Self {
            current_page,
            total_pages,
            pages: (start..=end).collect(),
            first: (start > 1).then_some(1),
            leading_ellipsis: start > 2,
            trailing_ellipsis: end + 1 < total_pages,
            last: (end < total_pages).then_some(total_pages),
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        })
    }
}
