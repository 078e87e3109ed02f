//! Page-number pagination utilities.
//!
//! Lists in the console are small and held in memory, so pagination is plain
//! slice arithmetic over an already filtered and sorted collection.

use std::ops::Range;

use serde::Serialize;
use thiserror::Error;

/// Number of rows shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Error type for page requests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("Page number must be at least 1")]
    ZeroPage,
    #[error("Page size must be at least 1")]
    ZeroPageSize,
}

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    page_size: usize,
}

impl PageRequest {
    /// Creates a page request. Pages are 1-based.
    pub fn new(page: usize, page_size: usize) -> Result<Self, PageError> {
        if page == 0 {
            return Err(PageError::ZeroPage);
        }
        if page_size == 0 {
            return Err(PageError::ZeroPageSize);
        }
        Ok(Self { page, page_size })
    }

    /// First page with the default page size.
    pub fn first() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of items plus the totals needed to render pager controls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Number of reachable pages. An empty list still has one (empty) page.
pub fn page_count(total_items: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total_items.div_ceil(page_size).max(1)
}

/// Pins a requested page into `[1, page_count]`.
pub fn clamp_page(page: usize, total_items: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total_items, page_size))
}

/// Index range covered by `page`, truncated to `total_items`.
pub fn page_bounds(page: usize, page_size: usize, total_items: usize) -> Range<usize> {
    let start = page.saturating_sub(1).saturating_mul(page_size).min(total_items);
    let end = start.saturating_add(page_size).min(total_items);
    start..end
}

/// Slices `items` to the requested page.
///
/// Requests past the last page are clamped so callers can never land on an
/// unreachable page.
pub fn paginate<T: Clone>(items: &[T], request: PageRequest) -> Page<T> {
    let total_items = items.len();
    let page = clamp_page(request.page, total_items, request.page_size);
    let range = page_bounds(page, request.page_size, total_items);

    Page {
        items: items[range].to_vec(),
        page,
        page_size: request.page_size,
        total_items,
        total_pages: page_count(total_items, request.page_size),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(n: usize) -> Vec<usize> {
        (0..n).collect()
    }

    #[test]
    fn test_page_request_rejects_zero_page() {
        assert_eq!(PageRequest::new(0, 10), Err(PageError::ZeroPage));
    }

    #[test]
    fn test_page_request_rejects_zero_page_size() {
        assert_eq!(PageRequest::new(1, 0), Err(PageError::ZeroPageSize));
    }

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page(), 1);
        assert_eq!(request.page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(30, 10), 3);
        assert_eq!(page_count(31, 10), 4);
        assert_eq!(page_count(1, 10), 1);
    }

    #[test]
    fn test_page_count_empty_list_has_one_page() {
        assert_eq!(page_count(0, 10), 1);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 25, 10), 1);
        assert_eq!(clamp_page(2, 25, 10), 2);
        assert_eq!(clamp_page(4, 25, 10), 3);
        assert_eq!(clamp_page(99, 0, 10), 1);
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(1, 10, 25), 0..10);
        assert_eq!(page_bounds(3, 10, 25), 20..25);
        assert_eq!(page_bounds(4, 10, 25), 25..25);
    }

    #[test]
    fn test_paginate_first_page() {
        let items = numbers(25);
        let page = paginate(&items, PageRequest::new(1, 10).unwrap());

        assert_eq!(page.items, (0..10).collect::<Vec<_>>());
        assert_eq!(page.total_items, 25);
        assert_eq!(page.total_pages, 3);
        assert!(!page.has_previous());
        assert!(page.has_next());
    }

    #[test]
    fn test_paginate_last_partial_page() {
        let items = numbers(25);
        let page = paginate(&items, PageRequest::new(3, 10).unwrap());

        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert_eq!(page.page, 3);
        assert!(page.has_previous());
        assert!(!page.has_next());
    }

    #[test]
    fn test_paginate_past_end_is_clamped() {
        let items = numbers(25);
        let page = paginate(&items, PageRequest::new(4, 10).unwrap());

        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_paginate_empty() {
        let items: Vec<usize> = Vec::new();
        let page = paginate(&items, PageRequest::first());

        assert!(page.is_empty());
        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
    }

    #[test]
    fn test_page_serialization() {
        let items = numbers(3);
        let page = paginate(&items, PageRequest::new(1, 2).unwrap());
        let json = serde_json::to_value(&page).unwrap();

        assert_eq!(json["items"], serde_json::json!([0, 1]));
        assert_eq!(json["total_pages"], 2);
        assert_eq!(json["page_size"], 2);
    }
}
