//! Chapter content extraction
//!
//! This module turns a chapter URL into plain text:
//! - Container selection by site rules or link-density scoring
//! - "Next page" pagination within one chapter
//! - Watermark line removal and sanitizing
//! - A fallback text block when nothing can be extracted

mod container;
mod noise;
mod paging;
mod sites;

pub use container::{container_score, readable_text};
pub use noise::NoiseFilter;
pub use paging::next_page_url;
pub use sites::{SiteTable, DEFAULT_SOURCE_LABEL};

use crate::book::Book;
use crate::config::ContentConfig;
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::text::{outline, sanitize_with_limit, split_paragraphs, OutlineEntry};
use crate::url::visit_key;
use scraper::Html;
use serde::Serialize;
use std::collections::HashSet;
use url::Url;

/// Intro used in the fallback block when the book has no description
const NO_CONTENT_NOTICE: &str = "当前页面未提取到正文。建议使用目录页地址重新导入。";

/// Closing hint of the fallback block; also its recognition marker
const REIMPORT_HINT: &str = "提示：优先使用小说目录页链接导入，可自动抓取整本章节。";

/// Chapter text ready for display or caching
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterText {
    pub text: String,
    pub paragraphs: Vec<String>,
    /// True when `text` is the fallback block; callers must not cache it
    pub is_fallback: bool,
}

impl ChapterText {
    pub fn new(text: String) -> Self {
        Self {
            is_fallback: is_fallback_content(&text),
            paragraphs: split_paragraphs(&text),
            text,
        }
    }

    /// In-text navigation points for books without a chapter list
    pub fn outline(&self) -> Vec<OutlineEntry> {
        outline(&self.text, &self.paragraphs)
    }
}

/// Builds the text shown when no chapter content could be extracted
///
/// The block always carries the book title, so it is never blank.
pub fn fallback_content(book: &Book) -> String {
    let intro = book
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_CONTENT_NOTICE);

    format!(
        "{}\n\n作者：{}\n来源：{}\n\n{}\n\n{}\n",
        book.title, book.author, book.source, intro, REIMPORT_HINT
    )
}

/// Returns true when `text` is a fallback block rather than chapter content
pub fn is_fallback_content(text: &str) -> bool {
    text.contains(REIMPORT_HINT)
}

/// Loads chapter text through a [`PageFetcher`]
pub struct ContentExtractor<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a ContentConfig,
    sites: &'a SiteTable,
    noise: &'a NoiseFilter,
}

impl<'a, F: PageFetcher + ?Sized> ContentExtractor<'a, F> {
    pub fn new(
        fetcher: &'a F,
        config: &'a ContentConfig,
        sites: &'a SiteTable,
        noise: &'a NoiseFilter,
    ) -> Self {
        Self {
            fetcher,
            config,
            sites,
            noise,
        }
    }

    /// Loads one chapter, following in-chapter pagination
    ///
    /// Pages are fetched one at a time until no further page is found, a page
    /// repeats, or `max_pages_per_chapter` is reached. A failed fetch stops
    /// pagination and keeps the text merged so far. The result is sanitized
    /// and may be empty; [`fallback_content`] covers that case.
    ///
    /// # Arguments
    ///
    /// * `url` - First page of the chapter
    /// * `next_chapter` - URL of the following chapter, never followed as a page
    pub async fn load_chapter(&self, url: &Url, next_chapter: Option<&Url>) -> String {
        let mut visited: HashSet<String> = HashSet::new();
        let mut merged = String::new();
        let mut current = Some(url.clone());
        let mut pages = 0;

        while let Some(page_url) = current.take() {
            if pages >= self.config.max_pages_per_chapter {
                tracing::debug!("Chapter page budget reached at {}", page_url);
                break;
            }
            if !visited.insert(visit_key(&page_url)) {
                break;
            }
            pages += 1;

            let page = match self.fetcher.fetch(&page_url).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::debug!("Chapter page {} unavailable: {}", page_url, e);
                    break;
                }
            };
            visited.insert(visit_key(&page.url));

            let (text, next) = self.scan_page(&page, next_chapter, &visited);
            if !text.trim().is_empty() {
                if !merged.is_empty() && !merged.ends_with("\n\n") {
                    merged.push_str("\n\n");
                }
                merged.push_str(&text);
            }
            current = next;
        }

        tracing::debug!("Loaded {} ({} pages, {} chars)", url, pages, merged.len());
        let cleaned = self.noise.strip(&merged);
        sanitize_with_limit(&cleaned, self.config.max_text_chars)
    }

    fn scan_page(
        &self,
        page: &FetchedPage,
        next_chapter: Option<&Url>,
        visited: &HashSet<String>,
    ) -> (String, Option<Url>) {
        let document = Html::parse_document(&page.body);
        let host = page.url.host_str().unwrap_or_default();
        let text = readable_text(&document, host, self.sites, &self.config.generic_selectors);
        let next = next_page_url(&document, &page.url, next_chapter, visited);
        (text, next)
    }
}
