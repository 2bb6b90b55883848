//! Harvester facade
//!
//! Wires configuration, a [`PageFetcher`], the site table and the noise
//! filter together, and exposes the import, sync and content-loading
//! entry points. Import and sync report failures as `None` after logging
//! them; the underlying components return `Result`.

use crate::book::{Book, BookImporter, IncrementalSync};
use crate::config::{validate, HarvestConfig};
use crate::content::{fallback_content, ChapterText, ContentExtractor, NoiseFilter, SiteTable};
use crate::crawler::{CatalogCrawler, CrawlOutcome, CrawlRequest, ProgressFn};
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::url::normalize_url;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Entry point for importing, syncing and reading web novels
pub struct Harvester<F: PageFetcher = HttpFetcher> {
    config: HarvestConfig,
    fetcher: F,
    sites: SiteTable,
    noise: NoiseFilter,
}

impl Harvester<HttpFetcher> {
    /// Creates a harvester that fetches over HTTP
    ///
    /// # Returns
    ///
    /// * `Ok(Harvester)` - Ready to use
    /// * `Err(HarvestError)` - Invalid configuration or HTTP client setup failure
    pub fn new(config: HarvestConfig) -> crate::Result<Self> {
        let fetcher = HttpFetcher::new(&config.fetcher)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher> Harvester<F> {
    /// Creates a harvester around any page source
    pub fn with_fetcher(config: HarvestConfig, fetcher: F) -> crate::Result<Self> {
        validate(&config)?;
        let noise = NoiseFilter::new(&config.content.noise_patterns)?;
        let sites = SiteTable::new(config.sites.clone());
        Ok(Self {
            config,
            fetcher,
            sites,
            noise,
        })
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn sites(&self) -> &SiteTable {
        &self.sites
    }

    /// Imports a book from a catalog or chapter URL
    ///
    /// Returns `None` when the URL is malformed or its page cannot be fetched.
    pub async fn import_from_url(&self, url: &str) -> Option<Book> {
        let importer = BookImporter::new(&self.fetcher, &self.config.crawler, &self.sites);
        match importer.import(url).await {
            Ok(book) => Some(book),
            Err(e) => {
                tracing::warn!("Import of {} failed: {}", url, e);
                None
            }
        }
    }

    /// Appends newly published chapters to a book
    ///
    /// Returns `None` when the sync failed or was cancelled; the caller keeps
    /// its existing book in that case.
    pub async fn sync_incremental(
        &self,
        book: &Book,
        max_pages: usize,
        progress: Option<&ProgressFn<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> Option<Book> {
        self.try_sync_incremental(book, max_pages, progress, cancel)
            .await
            .map_err(|e| tracing::warn!("Sync of \"{}\" failed: {}", book.title, e))
            .ok()
    }

    /// Same as [`Harvester::sync_incremental`], keeping the failure reason
    pub async fn try_sync_incremental(
        &self,
        book: &Book,
        max_pages: usize,
        progress: Option<&ProgressFn<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> crate::Result<Book> {
        IncrementalSync::new(&self.fetcher, &self.config.crawler)
            .sync(book, max_pages, progress, cancel)
            .await
    }

    /// Crawls a catalog URL without building a book
    pub async fn crawl_catalog(
        &self,
        url: &str,
        max_pages: usize,
        progress: Option<&ProgressFn<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> crate::Result<CrawlOutcome> {
        let start = normalize_url(url)?;
        let outcome = CatalogCrawler::new(&self.fetcher, &self.config.crawler)
            .with_progress(progress)
            .with_cancellation(cancel)
            .crawl(CrawlRequest::new(start, max_pages))
            .await;
        Ok(outcome)
    }

    /// Loads one chapter's text, never returning a blank string
    ///
    /// # Arguments
    ///
    /// * `book` - Book the chapter belongs to, used for the fallback block
    /// * `url` - First page of the chapter
    /// * `next_chapter` - URL of the following chapter, excluded from pagination
    pub async fn load_chapter(&self, book: &Book, url: &str, next_chapter: Option<&str>) -> String {
        let text = match Url::parse(url.trim()) {
            Ok(start) => {
                let hint = next_chapter.and_then(|n| Url::parse(n.trim()).ok());
                ContentExtractor::new(&self.fetcher, &self.config.content, &self.sites, &self.noise)
                    .load_chapter(&start, hint.as_ref())
                    .await
            }
            Err(e) => {
                tracing::debug!("Chapter URL {} rejected: {}", url, e);
                String::new()
            }
        };

        if text.trim().is_empty() {
            tracing::debug!("No content extracted from {}, using fallback", url);
            return fallback_content(book);
        }
        text
    }

    /// Loads the chapter at `chapter_index` as a display bundle
    ///
    /// The index is clamped to the chapter list. Books without chapters load
    /// their text URL as a single page.
    pub async fn load_book_content(&self, book: &Book, chapter_index: usize) -> ChapterText {
        let (url, next) = if book.chapters.is_empty() {
            (book.text_url.as_deref(), None)
        } else {
            let index = chapter_index.min(book.chapters.len() - 1);
            (
                Some(book.chapters[index].url.as_str()),
                book.chapters.get(index + 1).map(|c| c.url.as_str()),
            )
        };

        let text = match url {
            Some(url) => self.load_chapter(book, url, next).await,
            None => fallback_content(book),
        };
        ChapterText::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Chapter;
    use crate::crawler::CrawlProgress;
    use crate::fetcher::testing::MemoryFetcher;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chapter_page(body: &str) -> String {
        format!("<html><body><div id=\"content\">{}</div></body></html>", body)
    }

    fn book() -> Book {
        Book {
            id: "web:1".to_string(),
            title: "长夜行".to_string(),
            author: "青灯".to_string(),
            cover_url: None,
            description: None,
            text_url: Some("https://a.com/book/1/1.html".to_string()),
            catalog_url: Some("https://a.com/book/1/".to_string()),
            chapters: vec![
                Chapter::new("第1章", "https://a.com/book/1/1.html"),
                Chapter::new("第2章", "https://a.com/book/1/2.html"),
            ],
            source: "网页导入".to_string(),
        }
    }

    fn harvester(fetcher: MemoryFetcher) -> Harvester<MemoryFetcher> {
        Harvester::with_fetcher(HarvestConfig::default(), fetcher).unwrap()
    }

    #[tokio::test]
    async fn test_import_failure_is_none() {
        let h = harvester(MemoryFetcher::new());
        assert!(h.import_from_url("ftp://a.com/").await.is_none());
        assert!(h.import_from_url("https://a.com/book/1/").await.is_none());
    }

    #[tokio::test]
    async fn test_sync_failure_is_none() {
        let h = harvester(MemoryFetcher::new());
        assert!(h.sync_incremental(&book(), 10, None, None).await.is_none());
    }

    #[tokio::test]
    async fn test_crawl_catalog_reports_to_borrowed_state() {
        let page: String = (1..=8)
            .map(|i| format!("<a href=\"/book/1/{}.html\">第{}章</a>", i, i))
            .collect();
        let h = harvester(MemoryFetcher::new().with_page("https://a.com/book/1/", page));

        let found = AtomicUsize::new(0);
        let report = |p: CrawlProgress| found.store(p.found_chapters, Ordering::SeqCst);
        let outcome = h
            .crawl_catalog("https://a.com/book/1/", 5, Some(&report), None)
            .await
            .unwrap();

        assert_eq!(outcome.chapters.len(), 8);
        assert_eq!(found.load(Ordering::SeqCst), 8);
    }

    #[tokio::test]
    async fn test_load_book_content_clamps_index() {
        let fetcher = MemoryFetcher::new()
            .with_page("https://a.com/book/1/2.html", chapter_page("第二章正文"));
        let h = harvester(fetcher);
        let content = h.load_book_content(&book(), 99).await;
        assert_eq!(content.text, "第二章正文");
        assert!(!content.is_fallback);
        assert_eq!(content.paragraphs, vec!["第二章正文".to_string()]);
    }

    #[tokio::test]
    async fn test_load_book_content_falls_back() {
        let h = harvester(MemoryFetcher::new());
        let content = h.load_book_content(&book(), 0).await;
        assert!(content.is_fallback);
        assert!(content.text.contains("长夜行"));

        let mut empty = book();
        empty.chapters.clear();
        empty.text_url = None;
        let content = h.load_book_content(&empty, 3).await;
        assert!(content.is_fallback);
    }

    #[tokio::test]
    async fn test_load_chapter_never_blank() {
        let fetcher = MemoryFetcher::new()
            .with_page("https://a.com/book/1/1.html", chapter_page("   "));
        let h = harvester(fetcher);
        let text = h.load_chapter(&book(), "https://a.com/book/1/1.html", None).await;
        assert!(!text.trim().is_empty());
        assert!(text.contains("长夜行"));
        assert!(h.load_chapter(&book(), "not a url", None).await.contains("长夜行"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = HarvestConfig::default();
        config.crawler.min_chapters = 0;
        assert!(Harvester::with_fetcher(config, MemoryFetcher::new()).is_err());
    }
}
