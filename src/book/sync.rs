//! Incremental chapter-list sync

use crate::book::metadata::parse_metadata;
use crate::book::model::{Book, Chapter};
use crate::config::CrawlerConfig;
use crate::crawler::{CatalogCrawler, CrawlRequest, ProgressFn};
use crate::fetcher::PageFetcher;
use crate::url::normalize_url;
use crate::HarvestError;
use std::collections::HashSet;
use tokio_util::sync::CancellationToken;

/// Chapters of `fresh` that should be appended to `known`
///
/// When the last known chapter appears in `fresh`, only chapters after it
/// are considered; otherwise every chapter of `fresh` is. Either way,
/// chapters whose identity is already known are skipped.
pub fn appended_chapters(known: &[Chapter], fresh: &[Chapter]) -> Vec<Chapter> {
    let mut keys: HashSet<String> = known.iter().map(Chapter::identity).collect();

    let tail = match known.last().map(Chapter::identity) {
        Some(last) => match fresh.iter().position(|c| c.identity() == last) {
            Some(index) => &fresh[index + 1..],
            None => fresh,
        },
        None => fresh,
    };

    tail.iter()
        .filter(|chapter| keys.insert(chapter.identity()))
        .cloned()
        .collect()
}

/// Extends a book's chapter list with newly published chapters
pub struct IncrementalSync<'a, F: PageFetcher + ?Sized> {
    fetcher: &'a F,
    config: &'a CrawlerConfig,
}

impl<'a, F: PageFetcher + ?Sized> IncrementalSync<'a, F> {
    pub fn new(fetcher: &'a F, config: &'a CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// Re-crawls the book's catalog from the tail and appends new chapters
    ///
    /// Existing chapters are never removed, reordered or modified. Missing
    /// catalog/text URLs and cover are backfilled from the crawl.
    ///
    /// # Errors
    ///
    /// * `MissingEntryUrl` - The book has neither a catalog nor a text URL
    /// * `Cancelled` - The token fired before the crawl finished
    /// * `CatalogUnavailable` - Not a single catalog page could be fetched
    pub async fn sync(
        &self,
        book: &Book,
        max_pages: usize,
        progress: Option<&ProgressFn<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> crate::Result<Book> {
        let entry = book
            .entry_url()
            .ok_or_else(|| HarvestError::MissingEntryUrl {
                book_id: book.id.clone(),
            })?;
        let entry_url = normalize_url(entry)?;

        let request = CrawlRequest::new(entry_url.clone(), max_pages).incremental_for(book);
        let outcome = CatalogCrawler::new(self.fetcher, self.config)
            .with_progress(progress)
            .with_cancellation(cancel)
            .crawl(request)
            .await;

        if outcome.cancelled {
            return Err(HarvestError::Cancelled);
        }
        if outcome.pages_fetched_ok == 0 {
            return Err(HarvestError::CatalogUnavailable {
                url: entry_url.to_string(),
            });
        }

        let appended = appended_chapters(&book.chapters, &outcome.chapters);
        let mut updated = book.clone();

        if updated.catalog_url.is_none() && !outcome.chapters.is_empty() {
            updated.catalog_url = Some(entry_url.to_string());
        }
        if updated.cover_url.is_none() {
            if let Some(document) = outcome.start_document.as_deref() {
                updated.cover_url = parse_metadata(document, &entry_url).cover_url;
            }
        }
        updated.chapters.extend(appended.iter().cloned());
        if updated.text_url.is_none() {
            updated.text_url = updated.chapters.first().map(|c| c.url.clone());
        }

        tracing::info!(
            "Synced \"{}\": {} new chapters ({} pages scanned, {} total)",
            updated.title,
            appended.len(),
            outcome.pages_scanned,
            updated.chapters.len()
        );
        Ok(updated)
    }
}
