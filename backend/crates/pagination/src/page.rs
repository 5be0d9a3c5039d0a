//! Page envelope pairing a window of items with the filtered total.

use serde::Serialize;

use crate::PageRequest;

/// A window of listing results.
///
/// `total_count` describes the whole filtered set, not the window, so
/// consecutive pages of an unchanged data set report the same total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    items: Vec<T>,
    total_count: u64,
    limit: u32,
    offset: u64,
}

impl<T> Page<T> {
    /// Build a page from its items, the filtered total and the window used.
    pub fn new(items: Vec<T>, total_count: u64, request: PageRequest) -> Self {
        Self {
            items,
            total_count,
            limit: request.limit(),
            offset: request.offset(),
        }
    }

    /// An empty page for a filter that matched nothing.
    #[must_use]
    pub const fn empty(request: PageRequest) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            limit: request.limit(),
            offset: request.offset(),
        }
    }

    /// Items in the window, in listing order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consume the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Number of items matching the filters across every page.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Window limit used to produce this page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Window offset used to produce this page.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether items exist beyond this window.
    #[must_use]
    pub fn has_more(&self) -> bool {
        let seen = u64::try_from(self.items.len()).unwrap_or(u64::MAX);
        self.offset.saturating_add(seen) < self.total_count
    }

    /// Transform every item while keeping the window metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            limit: self.limit,
            offset: self.offset,
        }
    }
}
