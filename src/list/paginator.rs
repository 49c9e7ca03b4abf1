//! Page slicing and navigation

use serde::Serialize;

/// Number of pages for `total` items; never less than 1.
///
/// "Page 1 of 1" with zero items is a valid state, not an error.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Zero-indexed slice `[(page-1)*size, page*size)` of `items`.
///
/// Pages past the end yield an empty slice; page 0 is read as page 1.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = (page.max(1) - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Clamp a requested page into `[1, page_count(total, page_size)]`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total, page_size))
}

/// Page cursor over a collection of known size.
///
/// Navigation clamps instead of failing, so out-of-range input from a
/// pagination bar is harmless.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page: usize,
    page_size: usize,
    total: usize,
}

impl Paginator {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        Self {
            page: clamp_page(page, total, page_size),
            page_size,
            total,
        }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total, self.page_size)
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.page.saturating_add(1))
    }

    pub fn previous(&mut self) -> usize {
        self.go_to(self.page.saturating_sub(1))
    }

    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = clamp_page(page, self.total, self.page_size);
        self.page
    }

    /// The current page of `items`
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        paginate(items, self.page, self.page_size)
    }

    pub fn meta(&self) -> PaginationMeta {
        PaginationMeta::new(self.page, self.page_size, self.total)
    }
}

/// Pagination metadata for a rendered page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of items (after search and filters)
    pub total: usize,

    /// Total number of pages (at least 1)
    pub total_pages: usize,

    pub has_next: bool,

    pub has_prev: bool,
}

impl PaginationMeta {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = page_count(total, page_size);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            page_size,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// 1-based index of the first item shown, 0 when empty
    pub fn first_item(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.page - 1) * self.page_size + 1
        }
    }

    /// 1-based index of the last item shown, 0 when empty
    pub fn last_item(&self) -> usize {
        (self.page * self.page_size).min(self.total)
    }
}

/// Page numbers for a pagination bar, `None` marking an ellipsis.
///
/// Shows `edge` pages at both ends and `around` pages on each side of the
/// current page.
///
/// ```
/// use bizlist::list::paginator::page_links;
///
/// let links = page_links(10, 5, 1, 1);
/// assert_eq!(
///     links,
///     vec![Some(1), None, Some(4), Some(5), Some(6), None, Some(10)]
/// );
/// ```
pub fn page_links(total_pages: usize, current: usize, edge: usize, around: usize) -> Vec<Option<usize>> {
    let total_pages = total_pages.max(1);
    let current = current.clamp(1, total_pages);

    let show = |p: usize| {
        p <= edge || p > total_pages.saturating_sub(edge) || current.abs_diff(p) <= around
    };

    let mut links = Vec::new();
    let mut gap = false;
    for p in 1..=total_pages {
        if show(p) {
            links.push(Some(p));
            gap = false;
        } else if !gap {
            links.push(None);
            gap = true;
        }
    }
    links
}
