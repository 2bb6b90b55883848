//! Book metadata from a catalog or chapter page

use crate::text::unescape_entities;
use crate::url::resolve_link;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

/// Longest title kept, in characters
const MAX_TITLE_CHARS: usize = 80;

/// Author used when none can be found
pub const UNKNOWN_AUTHOR: &str = "未知作者";

/// Title used when neither the page nor the chapter list names the book
pub const UNTITLED_BOOK: &str = "网页小说";

static AUTHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"作者[:：]\s*([\p{L}\p{N}_\-·]{2,20})").unwrap());

/// Catalog-page boilerplate appended to book titles
static TITLE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:最新章节列表|最新章节目录|最新章节|章节列表|章节目录|全文阅读|全文免费阅读|免费阅读|在线阅读|无弹窗|TXT下载|txt下载)")
        .unwrap()
});

/// Metadata resolved from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    /// Cleaned title; None when the page has no usable title
    pub title: Option<String>,
    pub author: String,
    pub description: Option<String>,
    pub cover_url: Option<String>,
}

/// Resolves title, author, description and cover from a page
///
/// # Examples
///
/// ```
/// use novel_harvest::book::parse_metadata;
/// use url::Url;
///
/// let html = r#"<html><head>
///     <title>长夜行最新章节列表_长夜行全文阅读_某某书屋</title>
///     <meta property="og:novel:author" content="青灯">
///     <meta property="og:image" content="/cover/1.jpg">
/// </head><body></body></html>"#;
/// let url = Url::parse("https://example.com/book/1/").unwrap();
/// let meta = parse_metadata(html, &url);
/// assert_eq!(meta.title.as_deref(), Some("长夜行"));
/// assert_eq!(meta.author, "青灯");
/// assert_eq!(meta.cover_url.as_deref(), Some("https://example.com/cover/1.jpg"));
/// ```
pub fn parse_metadata(html: &str, page_url: &Url) -> BookMetadata {
    let document = Html::parse_document(html);
    resolve_metadata(&document, page_url)
}

pub(crate) fn resolve_metadata(document: &Html, page_url: &Url) -> BookMetadata {
    BookMetadata {
        title: resolve_title(document),
        author: resolve_author(document),
        description: meta_content(document, "description")
            .or_else(|| meta_content(document, "og:description")),
        cover_url: resolve_cover(document, page_url),
    }
}

/// Gets a meta tag's content by `name` or `property`
fn meta_content(document: &Html, name: &str) -> Option<String> {
    for attr in ["name", "property", "itemprop"] {
        let selector_str = format!("meta[{}='{}']", attr, name);
        if let Ok(selector) = Selector::parse(&selector_str) {
            if let Some(content) = document
                .select(&selector)
                .filter_map(|elem| elem.value().attr("content"))
                .map(str::trim)
                .find(|c| !c.is_empty())
            {
                return Some(unescape_entities(content));
            }
        };
    }
    None
}

fn resolve_title(document: &Html) -> Option<String> {
    let raw = meta_content(document, "og:novel:book_name")
        .or_else(|| meta_content(document, "og:title"))
        .or_else(|| {
            let selector = Selector::parse("title").ok()?;
            document
                .select(&selector)
                .next()
                .map(|elem| elem.text().collect::<String>())
        })?;
    clean_title(&raw)
}

/// Strips catalog boilerplate and site names from a page title
pub fn clean_title(raw: &str) -> Option<String> {
    let stripped = TITLE_SUFFIX_RE.replace_all(raw.trim(), "");
    let head = stripped
        .split(['_', '|', '｜'])
        .map(str::trim)
        .find(|part| !part.is_empty())?;
    let head = head
        .trim_start_matches('《')
        .trim_end_matches('》')
        .trim()
        .trim_end_matches(|c| c == '-' || c == '—' || c == ',' || c == '，')
        .trim();
    if head.is_empty() {
        return None;
    }
    Some(head.chars().take(MAX_TITLE_CHARS).collect())
}

fn resolve_author(document: &Html) -> String {
    if let Some(author) = meta_content(document, "author")
        .or_else(|| meta_content(document, "og:novel:author"))
    {
        return author;
    }

    let Ok(selector) = Selector::parse("body") else {
        return UNKNOWN_AUTHOR.to_string();
    };
    let body_text = document
        .select(&selector)
        .next()
        .map(|body| body.text().collect::<Vec<_>>().join(" "))
        .unwrap_or_default();

    AUTHOR_RE
        .captures(&body_text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}

fn resolve_cover(document: &Html, page_url: &Url) -> Option<String> {
    let from_meta = ["og:image", "twitter:image", "image"]
        .iter()
        .find_map(|name| meta_content(document, name));

    let candidate = from_meta.or_else(|| {
        let selector = Selector::parse("img[src]").ok()?;
        document
            .select(&selector)
            .filter_map(|img| img.value().attr("src"))
            .map(str::trim)
            .find(|src| !src.is_empty())
            .map(str::to_string)
    })?;

    resolve_link(&candidate, page_url).map(|u| u.to_string())
}
