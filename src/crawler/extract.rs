//! Chapter extraction from one catalog page
//!
//! Anchors are scanned structurally first. Some catalog renderers put the
//! list in `<option>` elements or inline scripts, so the raw HTML is also
//! scanned with a few regexes and the results pass through the same filter.

use crate::book::Chapter;
use crate::classify::ChapterLinkFilter;
use crate::config::CrawlerConfig;
use crate::text::unescape_entities;
use crate::url::{resolve_link, CatalogScope};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static OPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<option[^>]*?\bvalue\s*=\s*["']([^"']+)["'][^>]*>\s*([^<]{2,80}?)\s*</option>"#)
        .unwrap()
});

/// `<a href="...">title</a>` written from a script, quotes possibly escaped
static SCRIPT_ANCHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a[^>]*?\bhref\s*=\s*\\?["']([^"'\\]+)\\?["'][^>]*>([^<]{1,80})</a>"#).unwrap()
});

/// `{"url": "...", "title": "..."}` style pairs
static SCRIPT_URL_TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)["']?(?:url|href|link|path)["']?\s*[:=]\s*["']([^"'\s]+)["']\s*[,;]\s*["']?(?:title|name|chaptername|text)["']?\s*[:=]\s*["']([^"']{1,80})["']"#,
    )
    .unwrap()
});

/// `{"title": "...", "url": "..."}` style pairs
static SCRIPT_TITLE_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)["']?(?:title|name|chaptername|text)["']?\s*[:=]\s*["']([^"']{1,80})["']\s*[,;]\s*["']?(?:url|href|link|path)["']?\s*[:=]\s*["']([^"'\s]+)["']"#,
    )
    .unwrap()
});

static UNICODE_ESCAPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\u([0-9a-fA-F]{4})").unwrap());

/// Extracts the chapter links of one catalog page
///
/// Within one page a repeated chapter keeps its last position, so a
/// "latest chapters" block above the full list does not reorder it.
///
/// # Arguments
///
/// * `html` - Decoded page body
/// * `page_url` - URL the body was served from
/// * `scope` - Book scope of the current crawl
/// * `config` - Title length bounds
pub fn extract_page_chapters(
    html: &str,
    page_url: &Url,
    scope: &CatalogScope,
    config: &CrawlerConfig,
) -> Vec<Chapter> {
    let document = Html::parse_document(html);
    extract_from_document(&document, html, page_url, scope, config)
}

pub(crate) fn extract_from_document(
    document: &Html,
    raw_html: &str,
    page_url: &Url,
    scope: &CatalogScope,
    config: &CrawlerConfig,
) -> Vec<Chapter> {
    let filter = ChapterLinkFilter::new(scope, page_url, config);
    let mut found = Vec::new();

    let mut push = |title: &str, href: &str| {
        let title = clean_title(title);
        if let Some(url) = resolve_link(href, page_url) {
            if filter.accepts(&title, &url) {
                found.push(Chapter::new(title, url.to_string()));
            }
        }
    };

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let text = element.text().collect::<String>();
            let title = if text.trim().is_empty() {
                element.value().attr("title").unwrap_or_default().to_string()
            } else {
                text
            };
            push(&title, href);
        }
    }

    for (title, href) in fallback_candidates(document, raw_html) {
        push(&title, &href);
    }

    keep_last_occurrence(found)
}

/// Title/href pairs from `<option>` lists and inline scripts
fn fallback_candidates(document: &Html, raw_html: &str) -> Vec<(String, String)> {
    let mut candidates: Vec<(String, String)> = OPTION_RE
        .captures_iter(raw_html)
        .map(|caps| (caps[2].to_string(), caps[1].to_string()))
        .collect();

    if let Ok(selector) = Selector::parse("script") {
        for script in document.select(&selector) {
            let body = script.text().collect::<String>();
            if body.trim().is_empty() {
                continue;
            }
            for caps in SCRIPT_ANCHOR_RE.captures_iter(&body) {
                candidates.push((unescape_js(&caps[2]), unescape_js(&caps[1])));
            }
            for caps in SCRIPT_URL_TITLE_RE.captures_iter(&body) {
                candidates.push((unescape_js(&caps[2]), unescape_js(&caps[1])));
            }
            for caps in SCRIPT_TITLE_URL_RE.captures_iter(&body) {
                candidates.push((unescape_js(&caps[1]), unescape_js(&caps[2])));
            }
        }
    }

    candidates
}

fn clean_title(raw: &str) -> String {
    let unescaped = unescape_entities(raw);
    unescaped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Undoes `\/` and `\uXXXX` escapes in script string literals
fn unescape_js(raw: &str) -> String {
    let slashes = raw.replace("\\/", "/");
    UNICODE_ESCAPE_RE
        .replace_all(&slashes, |caps: &regex::Captures| {
            u32::from_str_radix(&caps[1], 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}

fn keep_last_occurrence(chapters: Vec<Chapter>) -> Vec<Chapter> {
    let mut seen = HashSet::new();
    let mut kept: Vec<Chapter> = chapters
        .into_iter()
        .rev()
        .filter(|chapter| seen.insert(chapter.identity()))
        .collect();
    kept.reverse();
    kept
}
