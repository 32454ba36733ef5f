//! Pager math and links

use serde::Serialize;

/// Number of listing pages needed for `total` posts
///
/// Partial pages round up, so 23 posts at 10 per page need 3 pages.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// URL of the `number`-th listing page mounted at `base`
///
/// Page 1 lives at `base` itself; later pages live under
/// `base<page_dir>/<number>/`.
pub fn page_url(base: &str, page_dir: &str, number: usize) -> String {
    let base = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{}/", base)
    };

    if number <= 1 {
        base
    } else {
        format!("{}{}/{}/", base, page_dir, number)
    }
}

/// One numbered link in the pager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Pager state for one rendered listing page
#[derive(Debug, Clone, Serialize)]
pub struct Pagination {
    /// Total number of pages
    pub total: usize,
    /// 1-based ordinal of the page being rendered
    pub current: usize,
    pub pages: Vec<PageLink>,
    pub prev: Option<String>,
    pub next: Option<String>,
}

impl Pagination {
    /// Build pager links for a listing mounted at `base`
    pub fn build(
        total_posts: usize,
        per_page: usize,
        current: usize,
        base: &str,
        page_dir: &str,
    ) -> Self {
        let total = page_count(total_posts, per_page);
        let current = current.max(1);
        let href = |number: usize| page_url(base, page_dir, number);

        let pages = (1..=total)
            .map(|number| PageLink {
                number,
                href: href(number),
                current: number == current,
            })
            .collect();

        let prev = (current > 1 && total > 0).then(|| href(current - 1));
        let next = (current < total).then(|| href(current + 1));

        Pagination {
            total,
            current,
            pages,
            prev,
            next,
        }
    }
}
