//! Offset pagination and prev/next link construction.

use serde::{Deserialize, Serialize};

/// Query parameters shared by every listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// Row offset into the result set.
    #[serde(default)]
    pub offset: u64,
    /// Page size.
    #[serde(default = "default_limit")]
    pub limit: u64,
    /// Free-text search term.
    #[serde(default)]
    pub search: String,
}

const fn default_limit() -> u64 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
            search: String::new(),
        }
    }
}

/// Pagination block attached to listing responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_count: u64,
    pub current_page: u64,
    pub total_pages: u64,
    /// Absolute URL of the previous page, or null on the first page.
    pub prev: Option<String>,
    /// Absolute URL of the next page, or null on the last page.
    pub next: Option<String>,
}

/// Build pagination links for a listing.
///
/// `base_url` is the public origin (no trailing slash); `path` the request
/// path. Prev/next re-encode `offset∓limit`, the limit, and the search term.
#[must_use]
pub fn paginate(
    base_url: &str,
    path: &str,
    query: &PageQuery,
    total_count: u64,
) -> Pagination {
    let limit = query.limit.max(1);
    let current_page = query.offset / limit + 1;
    let total_pages = total_count.div_ceil(limit);

    let link = |offset: u64| {
        format!(
            "{}{}?offset={}&limit={}&search={}",
            base_url.trim_end_matches('/'),
            path,
            offset,
            limit,
            urlencoding::encode(&query.search),
        )
    };

    let prev = (current_page > 1).then(|| link(query.offset.saturating_sub(limit)));
    let next = (current_page < total_pages).then(|| link(query.offset + limit));

    Pagination {
        total_count,
        current_page,
        total_pages,
        prev,
        next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(offset: u64, limit: u64, search: &str) -> PageQuery {
        PageQuery {
            offset,
            limit,
            search: search.to_string(),
        }
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let p = paginate("http://localhost:3000", "/api/news", &query(0, 10, ""), 25);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 3);
        assert!(p.prev.is_none());
        assert_eq!(
            p.next.as_deref(),
            Some("http://localhost:3000/api/news?offset=10&limit=10&search=")
        );
    }

    #[test]
    fn test_last_page_has_no_next() {
        let p = paginate("http://localhost:3000", "/api/news", &query(20, 10, ""), 25);
        assert_eq!(p.current_page, 3);
        assert!(p.next.is_none());
        assert_eq!(
            p.prev.as_deref(),
            Some("http://localhost:3000/api/news?offset=10&limit=10&search=")
        );
    }

    #[test]
    fn test_search_term_is_encoded() {
        let p = paginate(
            "http://localhost:3000",
            "/api/news",
            &query(0, 10, "open day"),
            30,
        );
        assert_eq!(
            p.next.as_deref(),
            Some("http://localhost:3000/api/news?offset=10&limit=10&search=open%20day")
        );
    }

    #[test]
    fn test_zero_limit_is_clamped() {
        let p = paginate("http://x", "/y", &query(0, 0, ""), 5);
        assert_eq!(p.current_page, 1);
        assert_eq!(p.total_pages, 5);
    }

    #[test]
    fn test_empty_result_set() {
        let p = paginate("http://x", "/y", &query(0, 10, ""), 0);
        assert_eq!(p.total_pages, 0);
        assert!(p.prev.is_none());
        assert!(p.next.is_none());
    }
}
