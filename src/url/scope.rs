//! Book scope: the host + path constraint for one catalog crawl

use crate::url::domain::{is_same_site, root_domain};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// File stems that name a listing page rather than a book directory
const LISTING_STEMS: &[&str] = &["index", "list", "mulu", "catalog", "all", "default"];

/// Numeric run long enough to be a book identifier
static BOOK_KEY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{3,}").unwrap());

/// Constraint used to reject links that belong to another book or an
/// unrelated part of the same site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogScope {
    /// Registrable domain of the catalog host
    pub host_root_domain: String,

    /// Directory the catalog lives in, without a trailing slash (`/` for the site root)
    pub path_prefix: String,

    /// Numeric book identifier found in the catalog path, if any
    pub book_key: Option<String>,
}

impl CatalogScope {
    /// Derives the scope from a catalog (or chapter) URL
    ///
    /// # Examples
    ///
    /// ```
    /// use novel_harvest::url::CatalogScope;
    /// use url::Url;
    ///
    /// let url = Url::parse("https://www.example.com/book/12345/index.html").unwrap();
    /// let scope = CatalogScope::from_url(&url);
    /// assert_eq!(scope.host_root_domain, "example.com");
    /// assert_eq!(scope.path_prefix, "/book/12345");
    /// assert_eq!(scope.book_key.as_deref(), Some("12345"));
    /// ```
    pub fn from_url(url: &Url) -> Self {
        let host_root_domain = url.host_str().map(root_domain).unwrap_or_default();

        let mut segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|seg| !seg.is_empty()).collect())
            .unwrap_or_default();

        let mut dropped = None;
        if let Some(last) = segments.last() {
            let is_file = last.contains('.') && !url.path().ends_with('/');
            if is_file || is_listing_segment(last) {
                dropped = segments.pop();
            }
        }

        let path_prefix = if segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", segments.join("/"))
        };

        // A catalog served as `/book/12345.html` carries its key in the file stem.
        let book_key = segments
            .iter()
            .rev()
            .chain(dropped.iter())
            .find_map(|seg| {
                BOOK_KEY_RE
                    .find_iter(seg)
                    .last()
                    .map(|m| m.as_str().to_string())
            });

        Self {
            host_root_domain,
            path_prefix,
            book_key,
        }
    }

    /// Returns true when the URL's host belongs to the catalog's site
    pub fn allows_host(&self, url: &Url) -> bool {
        match url.host_str() {
            Some(host) => is_same_site(host, &self.host_root_domain),
            None => false,
        }
    }

    /// Returns true when the URL's path belongs to this book
    ///
    /// A path containing the book key is accepted even outside the prefix,
    /// since many sites serve the catalog and chapters from sibling directories
    /// (`/book/123/` vs `/read/123/1.html`).
    pub fn allows_path(&self, url: &Url) -> bool {
        let path = url.path();
        if let Some(key) = &self.book_key {
            if contains_number(path, key) {
                return true;
            }
        }

        if self.path_prefix == "/" {
            return self.book_key.is_none();
        }

        path == self.path_prefix || path.starts_with(&format!("{}/", self.path_prefix))
    }

    /// Full scope check: same site and same book
    pub fn allows(&self, url: &Url) -> bool {
        self.allows_host(url) && self.allows_path(url)
    }
}

/// Returns true when `segment` names a listing page (`index.html`, `list_2`, `mulu`)
pub(crate) fn is_listing_segment(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    let stem = lower.split('.').next().unwrap_or("");
    let stem = stem.trim_end_matches(|c: char| c.is_ascii_digit() || c == '_' || c == '-');
    LISTING_STEMS.contains(&stem)
}

/// Matches `key` as a whole number inside `haystack` (not as part of a longer run)
fn contains_number(haystack: &str, key: &str) -> bool {
    let bytes = haystack.as_bytes();
    haystack.match_indices(key).any(|(start, _)| {
        let end = start + key.len();
        let before_ok = start == 0 || !bytes[start - 1].is_ascii_digit();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_digit();
        before_ok && after_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(url: &str) -> CatalogScope {
        CatalogScope::from_url(&Url::parse(url).unwrap())
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_scope_from_directory_catalog() {
        let s = scope("https://www.example.com/book/12345/");
        assert_eq!(s.host_root_domain, "example.com");
        assert_eq!(s.path_prefix, "/book/12345");
        assert_eq!(s.book_key.as_deref(), Some("12345"));
    }

    #[test]
    fn test_scope_from_chapter_url() {
        let s = scope("https://m.example.com/12_12345/678.html");
        assert_eq!(s.path_prefix, "/12_12345");
        assert_eq!(s.book_key.as_deref(), Some("12345"));
    }

    #[test]
    fn test_scope_from_listing_page() {
        let s = scope("https://example.com/novel/abc/mulu");
        assert_eq!(s.path_prefix, "/novel/abc");
        assert_eq!(s.book_key, None);
    }

    #[test]
    fn test_scope_key_from_file_stem() {
        let s = scope("https://example.com/book/12345.html");
        assert_eq!(s.path_prefix, "/book");
        assert_eq!(s.book_key.as_deref(), Some("12345"));
        assert!(s.allows(&url("https://example.com/12345/1.html")));
    }

    #[test]
    fn test_scope_site_root() {
        let s = scope("https://example.com/");
        assert_eq!(s.path_prefix, "/");
        assert_eq!(s.book_key, None);
        assert!(s.allows(&url("https://example.com/anything/1.html")));
    }

    #[test]
    fn test_allows_same_book() {
        let s = scope("https://www.example.com/book/12345/");
        assert!(s.allows(&url("https://www.example.com/book/12345/1.html")));
        assert!(s.allows(&url("https://m.example.com/read/12345/2.html")));
        assert!(s.allows(&url("https://example.com/book/12345/index_2.html")));
    }

    #[test]
    fn test_rejects_other_book() {
        let s = scope("https://www.example.com/book/12345/");
        assert!(!s.allows(&url("https://www.example.com/book/99999/1.html")));
        assert!(!s.allows(&url("https://www.example.com/book/123456/1.html")));
        assert!(!s.allows(&url("https://www.example.com/top.html")));
    }

    #[test]
    fn test_rejects_other_site() {
        let s = scope("https://www.example.com/book/12345/");
        assert!(!s.allows(&url("https://other.com/book/12345/1.html")));
        assert!(!s.allows_host(&url("https://notexample.com/")));
    }

    #[test]
    fn test_prefix_without_key() {
        let s = scope("https://example.com/novel/abc/");
        assert!(s.allows(&url("https://example.com/novel/abc/ch-1.html")));
        assert!(!s.allows(&url("https://example.com/novel/abcd/ch-1.html")));
    }

    #[test]
    fn test_listing_segment() {
        assert!(is_listing_segment("index.html"));
        assert!(is_listing_segment("index_3.html"));
        assert!(is_listing_segment("List"));
        assert!(is_listing_segment("mulu"));
        assert!(!is_listing_segment("1234.html"));
        assert!(!is_listing_segment("chapter-1.html"));
    }
}
