//! Book import from a single URL

use crate::book::metadata::{resolve_metadata, BookMetadata, UNTITLED_BOOK};
use crate::book::model::{book_id, Book, Chapter};
use crate::config::CrawlerConfig;
use crate::content::SiteTable;
use crate::crawler::{extract_from_document, CatalogCrawler, CrawlRequest};
use crate::fetcher::PageFetcher;
use crate::url::{normalize_url, CatalogScope};
use scraper::Html;
use url::Url;

/// Builds a [`Book`] from one catalog or chapter URL
pub struct BookImporter<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a CrawlerConfig,
    sites: &'a SiteTable,
}

impl<'a, F: PageFetcher + ?Sized> BookImporter<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a CrawlerConfig, sites: &'a SiteTable) -> Self {
        Self {
            fetcher,
            config,
            sites,
        }
    }

    /// Imports a book
    ///
    /// The seed page is fetched once. Chapters are first extracted from the
    /// seed page alone; when that yields fewer than `min_chapters`, a
    /// multi-page catalog crawl bounded by `import_max_pages` runs instead,
    /// reusing the seed document.
    ///
    /// # Returns
    ///
    /// * `Ok(Book)` - The imported book, possibly without chapters
    /// * `Err(HarvestError)` - The URL is malformed or the seed page is unavailable
    pub async fn import(&self, url: &str) -> crate::Result<Book> {
        let requested = normalize_url(url)?;
        let page = self.fetcher.fetch(&requested).await?;
        let page_url = page.url.clone();
        let scope = CatalogScope::from_url(&page_url);

        let (mut chapters, metadata) = scan_seed(&page.body, &page_url, &scope, self.config);
        tracing::debug!(
            "Seed page {} yielded {} chapters directly",
            page_url,
            chapters.len()
        );

        if chapters.len() < self.config.min_chapters {
            let request = CrawlRequest::new(page_url.clone(), self.config.import_max_pages)
                .with_scope(scope)
                .with_seed_document(page.body);
            chapters = CatalogCrawler::new(self.fetcher, self.config)
                .crawl(request)
                .await
                .chapters;
        }

        let title = metadata
            .title
            .clone()
            .or_else(|| title_from_chapters(&chapters))
            .unwrap_or_else(|| UNTITLED_BOOK.to_string());
        let source = self
            .sites
            .source_label(page_url.host_str().unwrap_or_default())
            .to_string();

        let book = Book {
            id: book_id(requested.as_str()),
            title,
            author: metadata.author,
            cover_url: metadata.cover_url,
            description: metadata.description,
            text_url: Some(
                chapters
                    .first()
                    .map(|c| c.url.clone())
                    .unwrap_or_else(|| page_url.to_string()),
            ),
            catalog_url: (!chapters.is_empty()).then(|| page_url.to_string()),
            chapters,
            source,
        };

        tracing::info!(
            "Imported \"{}\" from {} ({} chapters)",
            book.title,
            page_url,
            book.chapters.len()
        );
        Ok(book)
    }
}

/// Single-page chapter attempt plus metadata, without holding the document
fn scan_seed(
    body: &str,
    page_url: &Url,
    scope: &CatalogScope,
    config: &CrawlerConfig,
) -> (Vec<Chapter>, BookMetadata) {
    let document = Html::parse_document(body);
    let mut chapters = extract_from_document(&document, body, page_url, scope, config);
    if chapters.len() < config.min_chapters {
        chapters.clear();
    }
    (chapters, resolve_metadata(&document, page_url))
}

/// Book title guessed from the text before `第` in the first chapter title
fn title_from_chapters(chapters: &[Chapter]) -> Option<String> {
    let first = chapters.first()?;
    let (before, _) = first.title.split_once('第')?;
    let before = before.trim();
    (!before.is_empty()).then(|| before.to_string())
}
