//! Page-number pagination over sea-orm selects.
//!
//! Listings are served in fixed-size slices addressed by a 1-based page
//! index. A request past the final page falls back to the final page rather
//! than erroring, and an empty listing is a single empty page.

use quill_common::{AppError, AppResult};
use sea_orm::{ConnectionTrait, ItemsAndPagesNumber, Paginator, SelectorTrait};
use serde::Serialize;

/// Fixed number of items per page.
pub const PAGE_SIZE: u64 = 10;

/// One slice of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Items on this page, at most [`PAGE_SIZE`] of them.
    pub items: Vec<T>,
    /// 1-based index of this page.
    pub page: u64,
    /// Total number of pages; at least 1 even for an empty listing.
    pub total_pages: u64,
    /// Total number of items across all pages.
    pub total_items: u64,
    /// Whether a later page exists.
    pub has_next: bool,
    /// Whether an earlier page exists.
    pub has_prev: bool,
}

impl<T> Page<T> {
    /// A single empty page (for listings known to have no source rows).
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            total_pages: 1,
            total_items: 0,
            has_next: false,
            has_prev: false,
        }
    }

    /// Map the items of this page, keeping the slice metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

/// Clamp a requested 1-based page index to the valid range.
///
/// Page 0 is treated as page 1; anything past the final page falls back to
/// the final page.
#[must_use]
pub const fn clamp_page(requested: u64, total_pages: u64) -> u64 {
    let last = if total_pages == 0 { 1 } else { total_pages };
    if requested == 0 {
        1
    } else if requested > last {
        last
    } else {
        requested
    }
}

/// Fetch one clamped page from a paginator.
pub async fn fetch_page<'db, C, S>(
    paginator: Paginator<'db, C, S>,
    requested: u64,
) -> AppResult<Page<S::Item>>
where
    C: ConnectionTrait,
    S: SelectorTrait + 'db,
{
    let ItemsAndPagesNumber {
        number_of_items,
        number_of_pages,
    } = paginator
        .num_items_and_pages()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let page = clamp_page(requested, number_of_pages);
    let items = paginator
        .fetch_page(page - 1)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let total_pages = number_of_pages.max(1);
    Ok(Page {
        items,
        page,
        total_pages,
        total_items: number_of_items,
        has_next: page < total_pages,
        has_prev: page > 1,
    })
}
