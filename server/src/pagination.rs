use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const MAX_PAGE_SIZE: i64 = 100;

/// Query parameters for page-number pagination.
#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
pub struct PageParams {
    /// 1-based page number (default 1)
    pub page: Option<i64>,
    /// Items per page (default from server config, max 100)
    pub limit: Option<i64>,
}

/// Resolved, clamped pagination request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn from_params(params: &PageParams, default_limit: i64) -> Self {
        Self {
            page: params.page.unwrap_or(1).max(1),
            limit: params
                .limit
                .unwrap_or(default_limit)
                .clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// One page of results. `next` and `previous` are page numbers.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<i64>,
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(request: PageRequest, count: i64, results: Vec<T>) -> Self {
        let next = request
            .offset()
            .checked_add(request.limit)
            .filter(|&end| end < count)
            .and_then(|_| request.page.checked_add(1));
        let previous = (request.page > 1).then_some(request.page - 1);
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(page: Option<i64>, limit: Option<i64>) -> PageRequest {
        PageRequest::from_params(&PageParams { page, limit }, 6)
    }

    #[test]
    fn test_defaults_and_clamping() {
        assert_eq!(request(None, None), PageRequest { page: 1, limit: 6 });
        assert_eq!(request(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(
            request(Some(-3), Some(1000)),
            PageRequest { page: 1, limit: 100 }
        );
    }

    #[test]
    fn test_offset() {
        assert_eq!(request(Some(1), Some(10)).offset(), 0);
        assert_eq!(request(Some(3), Some(10)).offset(), 20);
    }

    #[test]
    fn test_next_and_previous() {
        let first = Page::new(request(Some(1), Some(2)), 5, vec![1, 2]);
        assert_eq!((first.next, first.previous), (Some(2), None));

        let last = Page::new(request(Some(3), Some(2)), 5, vec![5]);
        assert_eq!((last.next, last.previous), (None, Some(2)));

        let exact = Page::new(request(Some(2), Some(2)), 4, vec![3, 4]);
        assert_eq!(exact.next, None);
    }

    #[test]
    fn test_huge_page_number() {
        let req = request(Some(i64::MAX), Some(10));
        assert_eq!(req.offset(), i64::MAX);

        let page: Page<i32> = Page::new(req, 5, vec![]);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, Some(i64::MAX - 1));
    }

    #[test]
    fn test_map_keeps_links() {
        let page = Page::new(request(Some(2), Some(1)), 3, vec![2]).map(|n| n * 10);
        assert_eq!(page.results, vec![20]);
        assert_eq!((page.next, page.previous), (Some(3), Some(1)));
    }
}
