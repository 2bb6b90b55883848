//! Catalog page discovery and ordering

use crate::classify::{is_chapter_title, is_chapter_url, is_pagination_text, looks_like_pagination_url};
use crate::url::{resolve_link, visit_key, CatalogScope};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

static PAGE_PATH_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:(?:^|/)(?:index|list|mulu|page)[_\-/]?(\d+)(?:\.s?html?)?/?$|_(\d+)\.s?html?$)")
        .unwrap()
});

static PAGE_QUERY_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|&)(?:page|pageno|p)=(\d+)").unwrap());

/// A catalog page candidate found on the current page
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PageLink {
    pub url: Url,
    /// Largest number in the link text, else in the URL tail
    pub hint: u64,
    /// 0 for wording or URL-convention matches, 1 for bare same-directory links
    pub tier: u8,
}

/// Catalog page number encoded in a URL (`index_3.html`, `?page=3`)
pub fn page_number(url: &Url) -> Option<u64> {
    if let Some(caps) = PAGE_PATH_NUMBER_RE.captures(url.path()) {
        let digits = caps.get(1).or_else(|| caps.get(2))?;
        return digits.as_str().parse().ok();
    }
    url.query()
        .and_then(|q| PAGE_QUERY_NUMBER_RE.captures(q))
        .and_then(|caps| caps[1].parse().ok())
}

/// Page hint used to order newly discovered catalog pages
///
/// The largest number in the link text wins; without one, the largest number
/// in the last path segment or the query string is used.
pub fn page_hint(text: &str, url: &Url) -> u64 {
    if let Some(n) = largest_number(text) {
        return n;
    }

    let last_segment = url
        .path_segments()
        .and_then(|s| s.filter(|seg| !seg.is_empty()).last())
        .unwrap_or_default();
    let from_path = largest_number(last_segment);
    let from_query = url.query().and_then(largest_number);
    from_path.max(from_query).unwrap_or(0)
}

fn largest_number(text: &str) -> Option<u64> {
    NUMBER_RE
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<u64>().ok())
        .max()
}

/// Directory part of a path, with its trailing slash
fn parent_dir(url: &Url) -> &str {
    let path = url.path();
    match path.rfind('/') {
        Some(i) => &path[..=i],
        None => path,
    }
}

/// Collects catalog page candidates from a parsed page
///
/// Candidates are links whose text reads like pagination, whose URL follows a
/// pagination convention, or which sit in the same directory as the current
/// page. Chapter links never become candidates.
pub(crate) fn discover_pages(document: &Html, page_url: &Url, scope: &CatalogScope) -> Vec<PageLink> {
    let mut links = Vec::new();
    let mut seen = HashSet::new();
    let page_key = visit_key(page_url);
    let page_dir = parent_dir(page_url).to_string();

    let mut consider = |text: &str, href: &str| {
        let Some(url) = resolve_link(href, page_url) else {
            return;
        };
        if !scope.allows_host(&url) {
            return;
        }
        let key = visit_key(&url);
        if key == page_key || seen.contains(&key) {
            return;
        }

        let text = text.trim();
        let by_wording = is_pagination_text(text);
        let by_convention = looks_like_pagination_url(&url);

        // Range pickers ("第51-100章") read like chapter titles
        let is_range_link = by_wording && !is_chapter_url(&url, page_url);
        if is_chapter_title(text) && !is_range_link {
            return;
        }

        let same_dir = parent_dir(&url) == page_dir;

        if !by_wording && !by_convention && (!same_dir || is_chapter_url(&url, page_url)) {
            return;
        }
        if !scope.allows_path(&url) && !same_dir {
            return;
        }

        seen.insert(key);
        links.push(PageLink {
            hint: page_hint(text, &url),
            tier: if by_wording || by_convention { 0 } else { 1 },
            url,
        });
    };

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let text = element.text().collect::<String>();
                consider(&text, href);
            }
        }
    }

    // Page pickers: <select><option value="index_2.html">第2页</option></select>
    if let Ok(selector) = Selector::parse("option[value]") {
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr("value") {
                let text = element.text().collect::<String>();
                consider(&text, value);
            }
        }
    }

    links
}

/// Orders candidates: convention/wording matches first, then by page hint
pub(crate) fn order_pages(links: &mut [PageLink], descending: bool) {
    links.sort_by(|a, b| {
        let by_hint = if descending {
            b.hint.cmp(&a.hint)
        } else {
            a.hint.cmp(&b.hint)
        };
        a.tier.cmp(&b.tier).then(by_hint)
    });
}

/// Estimated catalog pages near the tail of a book's catalog
///
/// With `known` chapters at `per_page` chapters per page, the pages around
/// `known / per_page` are tried first, newest first.
pub(crate) fn tail_seed_urls(start: &Url, known: usize, per_page: usize) -> Vec<Url> {
    if per_page == 0 || known < per_page {
        return Vec::new();
    }

    let estimate = known / per_page;
    let dir = parent_dir(start).to_string();
    let extension = start
        .path_segments()
        .and_then(|s| s.filter(|seg| !seg.is_empty()).last())
        .filter(|_| !start.path().ends_with('/'))
        .and_then(|last| last.rsplit_once('.'))
        .map(|(_, ext)| ext.to_string())
        .unwrap_or_else(|| "html".to_string());

    [estimate + 1, estimate, estimate.saturating_sub(1)]
        .into_iter()
        .filter(|&n| n >= 2)
        .map(|n| {
            let mut url = start.clone();
            url.set_path(&format!("{}index_{}.{}", dir, n, extension));
            url.set_query(None);
            url
        })
        .collect()
}
