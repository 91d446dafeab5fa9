//! Pagination control

use std::fmt;

use super::result::RangeSummary;
use super::view::TableEvent;

/// Pages shown on either side of the current page.
pub const DEFAULT_PAGE_WINDOW: usize = 2;

/// Page sizes offered by default.
pub const DEFAULT_PAGE_SIZES: &[usize] = &[10, 25, 50, 100];

/// One entry of the page-button strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    /// A clickable page number.
    Page(usize),
    /// A collapsed gap, never clickable.
    Ellipsis,
}

impl fmt::Display for PageButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageButton::Page(n) => write!(f, "{n}"),
            PageButton::Ellipsis => f.write_str("..."),
        }
    }
}

/// Number of pages needed for `total` rows.
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1))
}

/// Computes the page-button strip.
///
/// The first page always shows. Pages within `window` of `current` show,
/// and so does the last page. A gap before or after the window collapses
/// into one ellipsis.
///
/// # Example
///
/// ```
/// use backoffice_lib::table::{page_buttons, PageButton::*};
///
/// assert_eq!(
///     page_buttons(10, 20, 2),
///     vec![Page(1), Ellipsis, Page(8), Page(9), Page(10), Page(11), Page(12), Ellipsis, Page(20)],
/// );
/// assert_eq!(page_buttons(2, 3, 2), vec![Page(1), Page(2), Page(3)]);
/// ```
pub fn page_buttons(current: usize, total_pages: usize, window: usize) -> Vec<PageButton> {
    // Signed so the window edges may fall below page 1.
    let current = current as i64;
    let total = total_pages as i64;
    let window = window as i64;

    let mut buttons = vec![PageButton::Page(1)];
    if current - window > 2 {
        buttons.push(PageButton::Ellipsis);
    }
    let from = (current - window).max(2);
    let to = (current + window).min(total - 1);
    buttons.extend((from..=to).map(|p| PageButton::Page(p as usize)));

    if current + window < total - 1 {
        buttons.push(PageButton::Ellipsis);
        buttons.push(PageButton::Page(total_pages));
    } else if total > 1 {
        buttons.push(PageButton::Page(total_pages));
    }
    buttons
}

/// State of the pagination bar below a table.
///
/// Produces [`TableEvent`]s for the clicks it allows and nothing for the
/// ones it disables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationModel {
    current_page: usize,
    total_pages: usize,
    page_size: usize,
    total_records: usize,
    window: usize,
    page_size_options: Vec<usize>,
    loading: bool,
}

impl PaginationModel {
    pub fn new(current_page: usize, total_pages: usize, page_size: usize, total_records: usize) -> Self {
        Self {
            current_page,
            total_pages,
            page_size,
            total_records,
            window: DEFAULT_PAGE_WINDOW,
            page_size_options: DEFAULT_PAGE_SIZES.to_vec(),
            loading: false,
        }
    }

    /// Pages shown on either side of the current one.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Disables every control while a fetch is in flight.
    pub fn with_loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn buttons(&self) -> Vec<PageButton> {
        page_buttons(self.current_page, self.total_pages, self.window)
    }

    pub fn summary(&self) -> RangeSummary {
        RangeSummary::new(self.current_page, self.page_size, self.total_records)
    }

    pub fn has_previous(&self) -> bool {
        !self.loading && self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        !self.loading && self.total_pages > 0 && self.current_page < self.total_pages
    }

    pub fn previous(&self) -> Option<TableEvent> {
        self.has_previous()
            .then(|| TableEvent::PageRequested(self.current_page - 1))
    }

    pub fn next(&self) -> Option<TableEvent> {
        self.has_next()
            .then(|| TableEvent::PageRequested(self.current_page + 1))
    }

    /// Clicks a page button. Ellipses emit nothing.
    pub fn click(&self, button: PageButton) -> Option<TableEvent> {
        match button {
            PageButton::Page(n) if !self.loading => Some(TableEvent::PageRequested(n)),
            _ => None,
        }
    }

    /// Picks a page size. Sizes not on offer emit nothing.
    pub fn select_page_size(&self, size: usize) -> Option<TableEvent> {
        (!self.loading && self.page_size_options.contains(&size))
            .then_some(TableEvent::PageSizeRequested(size))
    }
}
