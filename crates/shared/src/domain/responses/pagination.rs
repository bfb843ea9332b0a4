use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Pagination {
    pub page: i32,
    pub page_size: i32,
    pub total_items: i64,
    pub total_pages: i32,
}

impl Pagination {
    pub fn new(page: i32, page_size: i32, total_items: i64) -> Self {
        let page_size = page_size.max(1);
        let total_pages = ((total_items + page_size as i64 - 1) / page_size as i64) as i32;

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }

    /// Rows to skip before `page`, computed in `i64` so large pages cannot overflow.
    pub fn offset(page: i32, page_size: i32) -> i64 {
        (i64::from(page.max(1)) - 1) * i64::from(page_size.max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_partial_last_page() {
        assert_eq!(Pagination::new(1, 10, 0).total_pages, 0);
        assert_eq!(Pagination::new(1, 10, 10).total_pages, 1);
        assert_eq!(Pagination::new(2, 10, 11).total_pages, 2);
    }

    #[test]
    fn offset_does_not_overflow_on_large_pages() {
        assert_eq!(Pagination::offset(1, 10), 0);
        assert_eq!(Pagination::offset(0, 10), 0);
        assert_eq!(Pagination::offset(3, 25), 50);
        assert_eq!(Pagination::offset(30_000_000, 100), 2_999_999_900);
        assert_eq!(Pagination::offset(i32::MAX, 100), (i64::from(i32::MAX) - 1) * 100);
    }
}
