//! Page metadata wrapped around list responses.

use serde::{Deserialize, Serialize};

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// 1-based index of the returned page.
    pub current_page: u32,
    /// Page size used by the backend.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Index of the last page; at least 1.
    pub last_page: u32,
}

impl PageMeta {
    /// Whether a page after the current one exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }

    /// Whether a page before the current one exists.
    #[must_use]
    pub const fn has_prev(&self) -> bool {
        self.current_page > 1
    }
}

/// A page of items plus its metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Paginated<T> {
    /// Items on this page.
    pub data: Vec<T>,
    /// Position of this page within the full listing.
    pub meta: PageMeta,
}
