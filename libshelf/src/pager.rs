//! Fixed-size pages over a result set

/// Default number of rows per page
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// One page of results, numbered from 1
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub number: usize,
    pub items: &'a [T],
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }
}

/// Number of pages needed for `total` items; zero items make zero pages.
pub fn total_pages(total: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 0;
    }
    total.div_ceil(items_per_page)
}

/// Slice page `page` (1-based) out of `results`
///
/// Pages past the end, page 0, and a zero page size all yield an empty page
/// rather than an error.
pub fn paginate<T>(results: &[T], page: usize, items_per_page: usize) -> Page<'_, T> {
    let total_items = results.len();
    let total_pages = total_pages(total_items, items_per_page);

    let items = if page == 0 || items_per_page == 0 {
        &results[..0]
    } else {
        let start = (page - 1).saturating_mul(items_per_page).min(total_items);
        let end = page.saturating_mul(items_per_page).min(total_items);
        &results[start..end]
    };

    Page {
        number: page,
        items,
        total_items,
        total_pages,
    }
}
