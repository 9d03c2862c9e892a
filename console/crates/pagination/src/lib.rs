//! Page-window arithmetic shared by console collection views.
//!
//! [`Pager`] owns the `(page, page_size, total)` triple for a paged view and
//! derives the window every consumer needs: page count, offset, limit, and
//! boundary flags. It performs no I/O and holds no reference to the
//! collection being paged; callers apply `offset`/`limit` themselves.
//!
//! All setters clamp rather than fail, so a `Pager` can never be steered
//! outside the `[1, page_count]` range by user input arriving out of order
//! (for example a shrinking result set while the user sits on a late page).

use serde::{Deserialize, Serialize};

/// Initial values for a [`Pager`].
///
/// The defaults mirror a typical table view: first page, ten rows per page,
/// nothing loaded yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Starting page (1-based). Values below 1 are raised to 1.
    pub initial_page: usize,
    /// Starting page size. Values below `min_page_size` are raised to it.
    pub initial_page_size: usize,
    /// Starting total number of items.
    pub initial_total: usize,
    /// Smallest page size a later [`Pager::set_page_size`] call may select.
    /// A configured value of 0 is treated as 1.
    pub min_page_size: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            initial_page: 1,
            initial_page_size: 10,
            initial_total: 0,
            min_page_size: 1,
        }
    }
}

/// Pagination state for one collection view.
///
/// # Examples
/// ```
/// use pagination::Pager;
///
/// let mut pager = Pager::default();
/// pager.set_total(35);
/// assert_eq!(pager.page_count(), 4);
/// pager.set_page(4);
/// assert_eq!(pager.offset(), 30);
/// pager.set_total(3);
/// assert_eq!(pager.page(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pager {
    page: usize,
    page_size: usize,
    total: usize,
    min_page_size: usize,
}

impl Pager {
    /// Build a pager from explicit initial values.
    ///
    /// The initial page is raised to 1 when below it but is not clamped
    /// against the initial page count; the first setter call restores the
    /// upper bound.
    #[must_use]
    pub fn new(config: PagerConfig) -> Self {
        let min_page_size = config.min_page_size.max(1);
        Self {
            page: config.initial_page.max(1),
            page_size: config.initial_page_size.max(min_page_size),
            total: config.initial_total,
            min_page_size,
        }
    }

    /// Current page (1-based).
    #[must_use]
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Current page size.
    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Total number of items across all pages.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// Number of pages, always at least 1 even for an empty collection.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.total.div_ceil(self.page_size).max(1)
    }

    /// 0-based index of the first item on the current page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }

    /// Maximum number of items on the current page; equals the page size.
    #[must_use]
    pub const fn limit(&self) -> usize {
        self.page_size
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn can_next_page(&self) -> bool {
        self.page < self.page_count()
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn can_previous_page(&self) -> bool {
        self.page > 1
    }

    /// Jump to `page`, clamped into `[1, page_count]`.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.clamp(1, self.page_count());
    }

    /// Change the page size, clamped to the configured minimum.
    ///
    /// The current page is re-clamped downward when the new size yields
    /// fewer pages; it is never raised.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(self.min_page_size);
        self.page = self.page.min(self.page_count());
    }

    /// Replace the total item count, usually after a reload.
    ///
    /// The current page is re-clamped downward when the collection shrank
    /// below it.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
        self.page = self.page.min(self.page_count());
    }

    /// Advance one page; no-op on the last page.
    pub fn next_page(&mut self) {
        self.page = (self.page + 1).min(self.page_count());
    }

    /// Step back one page; no-op on the first page.
    pub fn previous_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self::new(PagerConfig::default())
    }
}
