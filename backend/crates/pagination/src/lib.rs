//! Page-number pagination primitives shared by TripTrack list endpoints.
//!
//! List endpoints accept an optional 1-based `page` and a `perPage` size and
//! respond with a [`Page`] envelope carrying the items alongside total counts.
//! [`PageRequest`] normalizes raw query parameters the lenient way the API
//! promises: out-of-range values are clamped rather than rejected, so a
//! malformed `page=0` yields the first page instead of an error.

use serde::{Deserialize, Serialize};

/// Items returned per page when the caller does not ask for a size.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Upper bound on the page size a caller may request.
pub const MAX_PER_PAGE: u32 = 100;

/// A normalized request for one page of a listing.
///
/// Construct via [`PageRequest::new`], which clamps raw query values into
/// range. The accessors expose Diesel-friendly `i64` offsets and limits.
///
/// # Example
///
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(Some(3), Some(20));
/// assert_eq!(request.page(), 3);
/// assert_eq!(request.per_page(), 20);
/// assert_eq!(request.offset(), 40);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request from raw query parameters.
    ///
    /// `page` defaults to 1 and is raised to 1 when zero. `per_page` defaults
    /// to [`DEFAULT_PER_PAGE`] and is clamped into `1..=`[`MAX_PER_PAGE`].
    #[must_use]
    pub fn new(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE),
        }
    }

    /// The 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// The clamped number of items per page.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1).saturating_mul(i64::from(self.per_page))
    }

    /// Row limit for this page, as Diesel expects it.
    #[must_use]
    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus the counts a client needs to render pagination.
///
/// Serializes with camelCase keys: `items`, `page`, `perPage`, `totalItems`,
/// `totalPages`. An empty listing still reports one (empty) page so clients
/// can always render page 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page, in listing order.
    pub items: Vec<T>,
    /// The 1-based page number these items belong to.
    pub page: u32,
    /// Page size the listing was cut into.
    pub per_page: u32,
    /// Total matching items across all pages.
    pub total_items: u64,
    /// Total page count; at least 1 even when there are no items.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Assemble a page from the items fetched for `request` and the total
    /// count of matching rows.
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page(),
            per_page: request.per_page(),
            total_items,
            total_pages: total_items.div_ceil(u64::from(request.per_page())).max(1),
        }
    }

    /// Convert the item type while keeping the envelope counts intact.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        u64::from(self.page) < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[rstest]
    #[case(None, None, 1, DEFAULT_PER_PAGE)]
    #[case(Some(0), Some(0), 1, 1)]
    #[case(Some(4), Some(25), 4, 25)]
    #[case(Some(2), Some(1_000), 2, MAX_PER_PAGE)]
    fn new_clamps_raw_parameters(
        #[case] page: Option<u32>,
        #[case] per_page: Option<u32>,
        #[case] expected_page: u32,
        #[case] expected_per_page: u32,
    ) {
        let request = PageRequest::new(page, per_page);
        assert_eq!(request.page(), expected_page);
        assert_eq!(request.per_page(), expected_per_page);
    }

    #[rstest]
    #[case(1, 10, 0)]
    #[case(2, 10, 10)]
    #[case(7, 9, 54)]
    fn offset_counts_from_page_one(
        #[case] page: u32,
        #[case] per_page: u32,
        #[case] expected: i64,
    ) {
        let request = PageRequest::new(Some(page), Some(per_page));
        assert_eq!(request.offset(), expected);
        assert_eq!(request.limit(), i64::from(per_page));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(10, 1)]
    #[case(11, 2)]
    #[case(95, 10)]
    fn total_pages_rounds_up_and_never_hits_zero(
        #[case] total_items: u64,
        #[case] expected_pages: u64,
    ) {
        let page: Page<u32> = Page::new(Vec::new(), PageRequest::new(None, None), total_items);
        assert_eq!(page.total_pages, expected_pages);
    }

    #[rstest]
    fn has_next_reflects_remaining_pages() {
        let request = PageRequest::new(Some(1), Some(2));
        let first: Page<u32> = Page::new(vec![1, 2], request, 5);
        assert!(first.has_next());

        let last: Page<u32> = Page::new(vec![5], PageRequest::new(Some(3), Some(2)), 5);
        assert!(!last.has_next());
    }

    #[rstest]
    fn map_preserves_counts() {
        let page = Page::new(vec![1, 2, 3], PageRequest::new(Some(2), Some(3)), 8);
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20, 30]);
        assert_eq!(mapped.page, 2);
        assert_eq!(mapped.total_items, 8);
        assert_eq!(mapped.total_pages, 3);
    }

    #[rstest]
    fn envelope_serializes_with_camel_case_keys() -> Result<(), serde_json::Error> {
        let page = Page::new(vec!["alpha"], PageRequest::new(Some(1), Some(1)), 2);
        let value = serde_json::to_value(&page)?;
        assert_eq!(
            value,
            json!({
                "items": ["alpha"],
                "page": 1,
                "perPage": 1,
                "totalItems": 2,
                "totalPages": 2,
            })
        );
        Ok(())
    }
}
