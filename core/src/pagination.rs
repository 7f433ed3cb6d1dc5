//! Page arithmetic for the table footer.

use std::ops::RangeInclusive;

/// Pages shown on either side of the current one.
const WINDOW: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
}

impl Pagination {
    #[must_use]
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            total,
        }
    }

    /// Never less than one, so an empty list still reads "Page 1 / 1".
    #[must_use]
    pub fn max_pages(&self) -> u32 {
        let pages = self.total.div_ceil(u64::from(self.limit)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// 1-based ordinal of the first row on this page, 0 when empty.
    #[must_use]
    pub fn start(&self) -> u64 {
        if self.total == 0 {
            0
        } else {
            u64::from(self.page - 1) * u64::from(self.limit) + 1
        }
    }

    #[must_use]
    pub fn end(&self) -> u64 {
        self.total.min(u64::from(self.page) * u64::from(self.limit))
    }

    /// Ordinal of row `index` of the current page.
    #[must_use]
    pub fn row_number(&self, index: usize) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit) + index as u64 + 1
    }

    #[must_use]
    pub fn clamp(&self, page: u32) -> u32 {
        page.clamp(1, self.max_pages())
    }

    /// Page buttons around the current page.
    #[must_use]
    pub fn window(&self) -> RangeInclusive<u32> {
        let max = self.max_pages();
        let left = self.page.saturating_sub(WINDOW).max(1);
        let right = self.page.saturating_add(WINDOW).min(max);
        left..=right
    }

    #[must_use]
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    #[must_use]
    pub fn has_next(&self) -> bool {
        self.page < self.max_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_pages() {
        assert_eq!(Pagination::new(1, 10, 0).max_pages(), 1);
        assert_eq!(Pagination::new(1, 10, 10).max_pages(), 1);
        assert_eq!(Pagination::new(1, 10, 11).max_pages(), 2);
    }

    #[test]
    fn test_visible_range() {
        let p = Pagination::new(3, 10, 25);
        assert_eq!((p.start(), p.end()), (21, 25));
        let empty = Pagination::new(1, 10, 0);
        assert_eq!((empty.start(), empty.end()), (0, 0));
    }

    #[test]
    fn test_row_number() {
        assert_eq!(Pagination::new(2, 20, 100).row_number(0), 21);
        assert_eq!(Pagination::new(1, 10, 5).row_number(4), 5);
    }

    #[test]
    fn test_window_and_clamp() {
        let p = Pagination::new(5, 10, 200);
        assert_eq!(p.window(), 3..=7);
        assert_eq!(Pagination::new(1, 10, 200).window(), 1..=3);
        assert_eq!(Pagination::new(2, 10, 25).window(), 1..=3);
        assert_eq!(p.clamp(0), 1);
        assert_eq!(p.clamp(99), 20);
    }

    #[test]
    fn test_huge_page_does_not_overflow() {
        let p = Pagination::new(u32::MAX, 10, 25);
        assert!(p.window().is_empty());
        assert!(p.has_prev() && !p.has_next());
        assert_eq!(p.clamp(p.page.saturating_add(1)), 3);
        assert_eq!(p.end(), 25);
    }

    #[test]
    fn test_prev_next() {
        let first = Pagination::new(1, 10, 30);
        assert!(!first.has_prev() && first.has_next());
        let last = Pagination::new(3, 10, 30);
        assert!(last.has_prev() && !last.has_next());
    }
}
