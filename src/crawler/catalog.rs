//! Catalog crawl loop
//!
//! One crawl is a breadth-first walk over catalog pages, bounded by a page
//! budget. Fetches happen one at a time because pagination is discovered
//! page by page.

use crate::book::{Book, Chapter};
use crate::config::CrawlerConfig;
use crate::crawler::extract::extract_from_document;
use crate::crawler::pagination::{discover_pages, order_pages, page_number, tail_seed_urls, PageLink};
use crate::crawler::progress::{CrawlProgress, ProgressFn};
use crate::crawler::state::CrawlState;
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::url::{visit_key, CatalogScope};
use scraper::Html;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Inputs of one catalog crawl
#[derive(Debug, Clone)]
pub struct CrawlRequest {
    /// Catalog page the crawl starts from
    pub start_url: Url,

    /// Already fetched body of `start_url`, reused instead of a second fetch
    pub seed_document: Option<String>,

    /// Book scope used to filter chapter and page links
    pub scope: CatalogScope,

    /// Maximum number of catalog pages attempted
    pub max_pages: usize,

    /// Identity keys of chapters the caller already has
    pub known_keys: HashSet<String>,

    /// Identity key of the caller's last chapter, the early-stop anchor
    pub last_known_key: Option<String>,

    /// Start near the estimated last catalog page and walk backwards
    pub prefer_tail: bool,
}

impl CrawlRequest {
    /// Creates a first-import request scoped to the start URL
    pub fn new(start_url: Url, max_pages: usize) -> Self {
        Self {
            scope: CatalogScope::from_url(&start_url),
            start_url,
            seed_document: None,
            max_pages,
            known_keys: HashSet::new(),
            last_known_key: None,
            prefer_tail: false,
        }
    }

    pub fn with_seed_document(mut self, body: impl Into<String>) -> Self {
        self.seed_document = Some(body.into());
        self
    }

    pub fn with_scope(mut self, scope: CatalogScope) -> Self {
        self.scope = scope;
        self
    }

    /// Turns the request into an incremental, tail-seeking one for `book`
    pub fn incremental_for(mut self, book: &Book) -> Self {
        self.known_keys = book.chapter_keys();
        self.last_known_key = book.last_chapter_key();
        self.prefer_tail = true;
        self
    }
}

/// Result of one catalog crawl
#[derive(Debug, Clone, Default)]
pub struct CrawlOutcome {
    /// Chapters in catalog order; empty when below the acceptance floor
    pub chapters: Vec<Chapter>,

    /// Catalog pages attempted
    pub pages_scanned: usize,

    /// Catalog pages that produced a document
    pub pages_fetched_ok: usize,

    /// Whether the crawl stopped on a cancellation signal
    pub cancelled: bool,

    /// Body of the start page, when it was fetched or seeded
    pub start_document: Option<String>,
}

/// Crawls paginated catalog pages through a [`PageFetcher`]
pub struct CatalogCrawler<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a CrawlerConfig,
    progress: Option<&'a ProgressFn<'a>>,
    cancel: Option<&'a CancellationToken>,
}

impl<'a, F: PageFetcher + ?Sized> CatalogCrawler<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a CrawlerConfig) -> Self {
        Self {
            fetcher,
            config,
            progress: None,
            cancel: None,
        }
    }

    /// Reports progress after every attempted page
    pub fn with_progress(mut self, progress: Option<&'a ProgressFn<'a>>) -> Self {
        self.progress = progress;
        self
    }

    /// Stops the crawl at the next page boundary once the token is cancelled
    pub fn with_cancellation(mut self, cancel: Option<&'a CancellationToken>) -> Self {
        self.cancel = cancel;
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(CancellationToken::is_cancelled)
    }

    fn report(&self, progress: CrawlProgress) {
        if let Some(callback) = self.progress {
            callback(progress);
        }
    }

    /// Runs the crawl
    ///
    /// Fetch failures skip the page; the crawl itself never fails. A result
    /// with fewer than `min_chapters` chapters is returned empty.
    pub async fn crawl(&self, request: CrawlRequest) -> CrawlOutcome {
        let CrawlRequest {
            start_url,
            mut seed_document,
            scope,
            max_pages,
            known_keys,
            last_known_key,
            prefer_tail,
        } = request;

        let mut state = CrawlState::new();
        let start_key = visit_key(&start_url);

        if prefer_tail {
            for seed in tail_seed_urls(&start_url, known_keys.len(), self.config.chapters_per_page) {
                state.enqueue(seed);
            }
        }
        state.enqueue(start_url.clone());

        tracing::info!(
            "Crawling catalog {} (budget {} pages, {} known chapters{})",
            start_url,
            max_pages,
            known_keys.len(),
            if prefer_tail { ", tail first" } else { "" }
        );

        let mut start_document = None;
        let mut cancelled = false;

        while state.pages < max_pages {
            if self.is_cancelled() {
                tracing::info!("Catalog crawl of {} cancelled", start_url);
                cancelled = true;
                break;
            }
            let Some(url) = state.next_url() else {
                break;
            };
            state.pages += 1;

            let is_start = visit_key(&url) == start_key;
            let seeded = if is_start { seed_document.take() } else { None };
            let page = match seeded {
                Some(body) => Some(FetchedPage {
                    url: url.clone(),
                    body,
                }),
                None => match self.fetcher.fetch(&url).await {
                    Ok(page) => Some(page),
                    Err(e) => {
                        tracing::debug!("Catalog page {} unavailable: {}", url, e);
                        None
                    }
                },
            };

            let mut stop = false;
            if let Some(page) = page {
                state.pages_fetched_ok += 1;
                state.mark_visited(&page.url);

                let (chapters, next_pages) = scan_page(&page, &scope, self.config, prefer_tail, &state);
                let found = chapters.len();
                let position = state
                    .page_order(&url)
                    .or_else(|| page_number(&url))
                    .unwrap_or(1);
                let contribution =
                    state.merge_page(chapters, position, &known_keys, last_known_key.as_deref());
                for next in next_pages {
                    let order = page_number(&next.url).unwrap_or(next.hint.max(1));
                    state.enqueue_at(next.url, order);
                }
                tracing::debug!(
                    "Catalog page {}: {} chapters, {} new, {} queued",
                    url,
                    found,
                    contribution.added,
                    state.frontier_len()
                );

                stop = state.record_contribution(contribution, self.config.stale_page_limit);
                if is_start {
                    start_document = Some(page.body);
                }
            }

            self.report(CrawlProgress {
                scanned_pages: state.pages,
                total_pages: max_pages,
                found_chapters: state.chapter_count(),
            });

            if stop {
                tracing::debug!(
                    "{} pages without new chapters after the last known one, stopping",
                    state.stale_streak
                );
                break;
            }
        }

        if seed_document.is_some() && start_document.is_none() {
            start_document = seed_document;
        }

        let pages_scanned = state.pages;
        let pages_fetched_ok = state.pages_fetched_ok;
        let mut chapters = state.into_chapters(prefer_tail);
        if chapters.len() < self.config.min_chapters {
            if !chapters.is_empty() {
                tracing::debug!(
                    "Discarding {} chapters from {} (below {})",
                    chapters.len(),
                    start_url,
                    self.config.min_chapters
                );
            }
            chapters.clear();
        }

        tracing::info!(
            "Catalog crawl of {} finished: {} chapters from {}/{} pages",
            start_url,
            chapters.len(),
            pages_fetched_ok,
            pages_scanned
        );

        CrawlOutcome {
            chapters,
            pages_scanned,
            pages_fetched_ok,
            cancelled,
            start_document,
        }
    }
}

/// Extracts chapters and next catalog pages from one document
///
/// The parsed document never lives across an await point.
fn scan_page(
    page: &FetchedPage,
    scope: &CatalogScope,
    config: &CrawlerConfig,
    descending: bool,
    state: &CrawlState,
) -> (Vec<Chapter>, Vec<PageLink>) {
    let document = Html::parse_document(&page.body);
    let chapters = extract_from_document(&document, &page.body, &page.url, scope, config);

    let mut links = discover_pages(&document, &page.url, scope);
    links.retain(|link| !state.is_known_url(&link.url));
    order_pages(&mut links, descending);

    (chapters, links)
}
