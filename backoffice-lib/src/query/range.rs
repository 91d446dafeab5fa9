//! Row ranges for paginated queries.

/// Inclusive, zero-based range of rows to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// First row index.
    pub start: usize,
    /// Last row index, inclusive.
    pub end: usize,
}

impl Range {
    /// Creates a range from `start` to `end` inclusive.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Range covering one page. `page` is 1-based; zero is treated as 1.
    ///
    /// ```
    /// use backoffice_lib::query::Range;
    ///
    /// assert_eq!(Range::for_page(3, 10), Range::new(20, 29));
    /// ```
    pub fn for_page(page: usize, page_size: usize) -> Self {
        let page = page.max(1);
        let size = page_size.max(1);
        Self {
            start: (page - 1) * size,
            end: page * size - 1,
        }
    }

    /// Number of rows the range spans.
    pub fn count(&self) -> usize {
        self.end.saturating_sub(self.start) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_page() {
        assert_eq!(Range::for_page(1, 10), Range::new(0, 9));
        assert_eq!(Range::for_page(2, 25), Range::new(25, 49));
        assert_eq!(Range::for_page(0, 10), Range::new(0, 9));
        assert_eq!(Range::for_page(4, 25).count(), 25);
    }
}
