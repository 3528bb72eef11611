//! One page of a remote collection.

use crate::task::TaskMarker;

/// Items for the current page plus the server-side total.
///
/// Replaced wholesale on every applied fetch; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> Default for ListPage<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

impl<T> ListPage<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of pages at `page_size`, never less than one.
    #[must_use]
    pub fn total_pages(&self, page_size: u32) -> u64 {
        let size = u64::from(page_size.max(1));
        self.total_count.div_ceil(size).max(1)
    }
}

impl<T: TaskMarker> ListPage<T> {
    /// True if any item still has a background task in progress.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.items.iter().any(TaskMarker::is_pending)
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_pending()).count()
    }
}
