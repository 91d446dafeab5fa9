//! Paginated results

use std::fmt;

/// "Showing {start} to {end} of {total} entries".
///
/// Both bounds are 1-based. For an empty result both are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSummary {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

impl RangeSummary {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        if total == 0 {
            return Self {
                start: 0,
                end: 0,
                total,
            };
        }
        let page = page.max(1);
        let start = (page - 1) * page_size + 1;
        Self {
            start: start.min(total),
            end: (page * page_size).min(total),
            total,
        }
    }
}

impl fmt::Display for RangeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Showing {} to {} of {} entries",
            self.start, self.end, self.total
        )
    }
}

/// One page of rows with the count of every matching row.
///
/// Replaced wholesale on every successful fetch. `has_more` is derived at
/// construction and always equals `total > page * page_size`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<R> {
    rows: Vec<R>,
    total: usize,
    page: usize,
    page_size: usize,
    has_more: bool,
}

impl<R> PaginatedResult<R> {
    /// Creates a result. `page` and `page_size` below 1 become 1.
    pub fn new(rows: Vec<R>, total: usize, page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let page_size = page_size.max(1);
        Self {
            rows,
            total,
            page,
            page_size,
            has_more: total > page * page_size,
        }
    }

    /// An empty first page.
    pub fn empty(page_size: usize) -> Self {
        Self::new(Vec::new(), 0, 1, page_size)
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<R> {
        self.rows
    }

    /// Number of rows matching the query across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// `ceil(total / page_size)`.
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.page_size)
    }

    pub fn range_summary(&self) -> RangeSummary {
        RangeSummary::new(self.page, self.page_size, self.total)
    }

    /// Appends the rows of the following page, as infinite scroll does.
    pub fn extend(&mut self, next: PaginatedResult<R>) {
        self.rows.extend(next.rows);
        self.total = next.total;
        self.page = next.page;
        self.has_more = next.has_more;
    }
}

impl<R> Default for PaginatedResult<R> {
    fn default() -> Self {
        Self::empty(10)
    }
}
