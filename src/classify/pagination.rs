//! Catalog pagination wording and URL conventions

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static PAGINATION_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)下一页|下页|下一頁|上一页|上页|上一頁|尾页|末页|next|prev|>>|<<|»|«|\d+\s*[-~～至到]\s*\d+|第\s*\d+\s*页",
    )
    .unwrap()
});

/// Wording that points at another chapter or back to the book page
static CHAPTER_NAVIGATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)下一章|上一章|目录|目錄|返回书页|返回書頁|next\s*chapter|prev(?:ious)?\s*chapter")
        .unwrap()
});

static PAGINATION_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|/)(?:index|list|mulu|page)[_\-/]?\d*(?:\.s?html?)?/?$|_\d+\.s?html?$")
        .unwrap()
});

static PAGINATION_QUERY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|&)(?:page|pageno|p)=\d+").unwrap());

/// Returns true when link text names a chapter or catalog hop, not a page
pub fn is_chapter_navigation_text(text: &str) -> bool {
    CHAPTER_NAVIGATION_RE.is_match(text)
}

/// Returns true when link text reads like catalog pagination
///
/// # Examples
///
/// ```
/// use novel_harvest::classify::is_pagination_text;
///
/// assert!(is_pagination_text("下一页"));
/// assert!(is_pagination_text("51 - 100章"));
/// assert!(!is_pagination_text("下一章"));
/// ```
pub fn is_pagination_text(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && !is_chapter_navigation_text(text) && PAGINATION_TEXT_RE.is_match(text)
}

/// Returns true when the URL follows a catalog pagination convention
/// (`index_2.html`, `list/3`, `_4.html`, `?page=5`)
pub fn looks_like_pagination_url(url: &Url) -> bool {
    if PAGINATION_PATH_RE.is_match(url.path()) {
        return true;
    }
    url.query().is_some_and(|q| PAGINATION_QUERY_RE.is_match(q))
}
