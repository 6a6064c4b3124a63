/// A read-only view over one ordered slice of a result set, plus the paging
/// metadata needed to render navigation.
///
/// The pager does not validate `current_page` against the page count; the
/// roster service does that before constructing one.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    pub total_count: i64,
    pub page_size: i64,
    pub current_page: i64,
    pub items: Vec<T>,
}

impl<T> Pager<T> {
    pub fn new(total_count: i64, page_size: i64, current_page: i64, items: Vec<T>) -> Self {
        Self {
            total_count,
            page_size,
            current_page,
            items,
        }
    }

    /// Number of pages needed to cover the full result set. Zero when the
    /// set is empty.
    pub fn total_pages(&self) -> i64 {
        (self.total_count + self.page_size - 1) / self.page_size
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(25, 10, 3)]
    #[case(5, 1, 5)]
    fn test_total_pages(#[case] total_count: i64, #[case] page_size: i64, #[case] expected: i64) {
        let pager: Pager<i32> = Pager::new(total_count, page_size, 1, vec![]);
        assert_eq!(pager.total_pages(), expected);
    }

    #[test]
    fn test_first_page_has_no_previous() {
        let pager = Pager::new(25, 10, 1, vec![1, 2]);
        assert!(!pager.has_previous_page());
        assert!(pager.has_next_page());
    }

    #[test]
    fn test_middle_page_has_both_neighbours() {
        let pager = Pager::new(25, 10, 2, vec![1, 2]);
        assert!(pager.has_previous_page());
        assert!(pager.has_next_page());
    }

    #[test]
    fn test_last_page_has_no_next() {
        let pager = Pager::new(25, 10, 3, vec![1, 2]);
        assert!(pager.has_previous_page());
        assert!(!pager.has_next_page());
    }

    #[test]
    fn test_empty_result_set() {
        let pager: Pager<i32> = Pager::new(0, 10, 1, vec![]);
        assert_eq!(pager.total_pages(), 0);
        assert!(!pager.has_previous_page());
        assert!(!pager.has_next_page());
    }
}
