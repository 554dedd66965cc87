//! Client-side page cursor for paginated listings.

use paydash_shared::models::PageMeta;

/// Default number of rows requested per page.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Page cursor for list views: 1-based page index plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: u32,
    per_page: u32,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl PageState {
    /// Starts at page 1 with `per_page` rows (at least 1).
    #[must_use]
    pub fn new(per_page: u32) -> Self {
        Self {
            page: 1,
            per_page: per_page.max(1),
        }
    }

    /// Current 1-based page.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Rows per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Advances one page if `meta` says another exists. Returns whether the
    /// page changed.
    pub fn next(&mut self, meta: &PageMeta) -> bool {
        if self.page < meta.last_page.max(1) {
            self.page += 1;
            true
        } else {
            false
        }
    }

    /// Steps back one page unless already on the first.
    pub fn prev(&mut self) -> bool {
        if self.page > 1 {
            self.page -= 1;
            true
        } else {
            false
        }
    }

    /// Jumps to `page`, clamped to `1..=meta.last_page`.
    pub fn go_to(&mut self, page: u32, meta: &PageMeta) {
        self.page = page.clamp(1, meta.last_page.max(1));
    }

    /// Changes the page size and returns to the first page.
    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Query parameters understood by the backend's list endpoints.
    #[must_use]
    pub const fn as_query(&self) -> [(&'static str, u32); 2] {
        [("page", self.page), ("per_page", self.per_page)]
    }
}
