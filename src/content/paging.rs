//! In-chapter "next page" discovery

use crate::classify::{is_chapter_navigation_text, looks_like_catalog_url};
use crate::url::{resolve_link, same_host, visit_key};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Conventional ids, classes and rels of a "next page" link
const NEXT_PAGE_SELECTORS: &[&str] = &["a#pb_next", "a#next", "a.next", "a[rel=next]"];

static NEXT_PAGE_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)下一页|下页|下一頁|\bnext\b").unwrap());

/// Finds the link to the next page of the same chapter
///
/// # Arguments
///
/// * `document` - Parsed current page
/// * `current` - URL of the current page
/// * `next_chapter` - URL of the following chapter, never treated as a page
/// * `visited` - Visit keys of pages already merged
///
/// # Returns
///
/// The first candidate that is not chapter/catalog navigation, not the next
/// chapter, not visited, on the same host and not catalog-like.
pub fn next_page_url(
    document: &Html,
    current: &Url,
    next_chapter: Option<&Url>,
    visited: &HashSet<String>,
) -> Option<Url> {
    let next_chapter_key = next_chapter.map(visit_key);
    let mut seen = HashSet::new();
    let mut candidates: Vec<(String, String)> = Vec::new();

    for selector_str in NEXT_PAGE_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for element in document.select(&selector) {
                if let Some(href) = element.value().attr("href") {
                    let text = element.text().collect::<String>();
                    candidates.push((href.to_string(), text));
                }
            }
        }
    }
    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let text = element.text().collect::<String>();
            if NEXT_PAGE_TEXT_RE.is_match(text.trim()) {
                if let Some(href) = element.value().attr("href") {
                    candidates.push((href.to_string(), text));
                }
            }
        }
    }

    for (href, text) in candidates {
        if !seen.insert(format!("{}|{}", href, text.trim())) {
            continue;
        }
        if is_chapter_navigation_text(&text) {
            continue;
        }
        let Some(url) = resolve_link(&href, current) else {
            continue;
        };
        let key = visit_key(&url);
        if next_chapter_key.as_deref() == Some(key.as_str()) || visited.contains(&key) {
            continue;
        }
        if !same_host(&url, current) || looks_like_catalog_url(&url) {
            continue;
        }
        return Some(url);
    }

    None
}
