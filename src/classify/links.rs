//! Chapter and catalog URL rules

use crate::url::{is_listing_segment, visit_key};
use url::Url;

/// Directory names that only ever hold listings
const LISTING_DIRS: &[&str] = &["mulu", "catalog", "sitemap", "list"];

/// Extensions of static detail pages
const DETAIL_EXTENSIONS: &[&str] = &[".html", ".htm", ".shtml"];

fn path_segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default()
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Segment without its file extension
fn stem(segment: &str) -> &str {
    segment.split('.').next().unwrap_or(segment)
}

/// Returns true when the URL looks like a catalog, index or sitemap page
///
/// Matches the site root, listing files (`index.html`, `list_2.html`,
/// `all.html`), listing directories (`/mulu/`, `/catalog/`) and two-level
/// purely numeric directory paths (`/12/12345/`).
pub fn looks_like_catalog_url(url: &Url) -> bool {
    let segments = path_segments(url);
    let Some(last) = segments.last() else {
        return true;
    };

    if is_listing_segment(last) {
        return true;
    }
    if segments
        .iter()
        .any(|seg| LISTING_DIRS.iter().any(|dir| seg.eq_ignore_ascii_case(dir)))
    {
        return true;
    }

    segments.len() == 2 && segments.iter().all(|seg| is_numeric(seg))
}

/// Returns true when the URL looks like a chapter detail page
///
/// # Arguments
///
/// * `url` - Candidate link
/// * `base` - The page the link was found on; a link back to it is rejected
///
/// # Examples
///
/// ```
/// use novel_harvest::classify::is_chapter_url;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/book/123/").unwrap();
/// let chapter = Url::parse("https://example.com/book/123/4567.html").unwrap();
/// let index = Url::parse("https://example.com/book/123/index_2.html").unwrap();
/// assert!(is_chapter_url(&chapter, &base));
/// assert!(!is_chapter_url(&index, &base));
/// ```
pub fn is_chapter_url(url: &Url, base: &Url) -> bool {
    if visit_key(url) == visit_key(base) {
        return false;
    }
    if looks_like_catalog_url(url) {
        return false;
    }

    let path = url.path().to_lowercase();
    if path.contains("/chapter") || path.contains("/read/") {
        return true;
    }

    if let Some(query) = url.query() {
        let query = query.to_lowercase();
        if query.contains("chapter") || query.contains("cid=") {
            return true;
        }
    }

    let segments = path_segments(url);
    let numeric = segments.iter().filter(|seg| is_numeric(stem(seg))).count();
    if numeric >= 3 {
        return true;
    }

    segments.last().is_some_and(|last| {
        let last = last.to_lowercase();
        DETAIL_EXTENSIONS.iter().any(|ext| last.ends_with(ext))
    })
}

/// Returns true when the last path segment carries a digit
pub(crate) fn last_segment_has_digit(url: &Url) -> bool {
    path_segments(url)
        .last()
        .is_some_and(|seg| seg.bytes().any(|b| b.is_ascii_digit()))
}
