//! Client-side pagination over an already-filtered view.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_SIZE: usize = 24;

/// Zero-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a derived view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub items: Vec<&'a T>,
    /// Page actually shown (clamped to the last page).
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn reset(&mut self) {
        self.page = 0;
    }

    pub fn next(&mut self) {
        self.page = self.page.saturating_add(1);
    }

    pub fn prev(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Slice a view. Out-of-range pages clamp to the last page so a shrinking
    /// collection (delete, refetch) never shows an empty page past the end.
    pub fn paginate<'a, T>(&self, items: &[&'a T]) -> Page<'a, T> {
        let page_size = self.page_size.max(1);
        let total_items = items.len();
        let total_pages = total_items.div_ceil(page_size);
        let page = self.page.min(total_pages.saturating_sub(1));
        let start = page * page_size;
        let end = (start + page_size).min(total_items);
        Page {
            items: items[start.min(total_items)..end].to_vec(),
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}
