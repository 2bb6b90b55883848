//! Per-book sync job registry

use crate::book::Book;
use crate::crawler::CrawlProgress;
use crate::fetcher::{HttpFetcher, PageFetcher};
use crate::harvester::Harvester;
use crate::HarvestError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// A running background sync
pub struct SyncHandle {
    /// Latest progress of the current attempt
    pub progress: watch::Receiver<CrawlProgress>,

    /// Resolves to the updated book, or None when the sync gave up or was cancelled
    pub join: JoinHandle<Option<Book>>,
}

/// Registry entry of a job in flight
struct ActiveSync {
    token: CancellationToken,
    generation: u64,
}

type ActiveMap = Arc<Mutex<HashMap<String, ActiveSync>>>;

fn lock(active: &ActiveMap) -> MutexGuard<'_, HashMap<String, ActiveSync>> {
    active.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes the entry of `book_id` unless a newer job has replaced it
fn release(active: &ActiveMap, book_id: &str, generation: u64) {
    let mut map = lock(active);
    if map.get(book_id).is_some_and(|entry| entry.generation == generation) {
        map.remove(book_id);
    }
}

/// Runs sync jobs with at most one active job per book
///
/// The registry is the only state shared between jobs; each crawl keeps its
/// own state.
pub struct SyncRegistry<F: PageFetcher + 'static = HttpFetcher> {
    harvester: Arc<Harvester<F>>,
    active: ActiveMap,
    next_generation: AtomicU64,
}

impl<F: PageFetcher + 'static> SyncRegistry<F> {
    pub fn new(harvester: Arc<Harvester<F>>) -> Self {
        Self {
            harvester,
            active: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    pub fn harvester(&self) -> &Arc<Harvester<F>> {
        &self.harvester
    }

    /// Returns true while a sync for `book_id` is registered
    pub fn is_active(&self, book_id: &str) -> bool {
        lock(&self.active).contains_key(book_id)
    }

    /// Cancels the sync of `book_id`, e.g. when the book is removed
    ///
    /// Returns false when no sync was running or it was already cancelled.
    /// The crawl stops at its next page boundary and a pending retry delay is
    /// cut short. The book stays registered until the job has exited, so a
    /// new sync cannot start while the cancelled one drains.
    pub fn cancel(&self, book_id: &str) -> bool {
        match lock(&self.active).get(book_id) {
            Some(entry) if !entry.token.is_cancelled() => {
                tracing::info!("Cancelling sync of book {}", book_id);
                entry.token.cancel();
                true
            }
            _ => false,
        }
    }

    fn register(&self, book_id: &str) -> Option<(CancellationToken, u64)> {
        let mut map = lock(&self.active);
        if map.contains_key(book_id) {
            return None;
        }
        let token = CancellationToken::new();
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        map.insert(
            book_id.to_string(),
            ActiveSync {
                token: token.clone(),
                generation,
            },
        );
        Some((token, generation))
    }

    /// Starts a background sync with bounded retries
    ///
    /// # Returns
    ///
    /// * `Some(SyncHandle)` - The job was spawned
    /// * `None` - A sync for this book is already running
    pub fn start_sync(&self, book: Book) -> Option<SyncHandle> {
        let Some((token, generation)) = self.register(&book.id) else {
            tracing::debug!("Sync of book {} already running", book.id);
            return None;
        };

        let (tx, rx) = watch::channel(CrawlProgress::default());
        let harvester = Arc::clone(&self.harvester);
        let active = Arc::clone(&self.active);

        let join = tokio::spawn(async move {
            let result = sync_with_retries(&harvester, &book, &token, &tx).await;
            release(&active, &book.id, generation);
            result
        });

        Some(SyncHandle { progress: rx, join })
    }

    /// Syncs every book, at most `max_concurrent_refreshes` at a time
    ///
    /// Books are returned in input order, updated or unchanged. A book whose
    /// sync is already running elsewhere is returned unchanged.
    pub async fn refresh_all(&self, books: Vec<Book>) -> Vec<Book> {
        let sync_config = &self.harvester.config().sync;
        let max_pages = self.harvester.config().crawler.sync_max_pages;
        let semaphore = Arc::new(Semaphore::new(sync_config.max_concurrent_refreshes.max(1)));

        tracing::info!(
            "Refreshing {} books ({} at a time)",
            books.len(),
            sync_config.max_concurrent_refreshes
        );

        let mut jobs = Vec::with_capacity(books.len());
        for book in books {
            let Some((token, generation)) = self.register(&book.id) else {
                jobs.push((book, None));
                continue;
            };
            let harvester = Arc::clone(&self.harvester);
            let active = Arc::clone(&self.active);
            let semaphore = Arc::clone(&semaphore);
            let original = book.clone();

            let job = tokio::spawn(async move {
                let updated = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        harvester
                            .sync_incremental(&book, max_pages, None, Some(&token))
                            .await
                    }
                    Err(_) => None,
                };
                release(&active, &book.id, generation);
                updated
            });
            jobs.push((original, Some(job)));
        }

        let mut refreshed = Vec::with_capacity(jobs.len());
        for (original, job) in jobs {
            let updated = match job {
                Some(job) => job.await.ok().flatten(),
                None => None,
            };
            refreshed.push(updated.unwrap_or(original));
        }
        refreshed
    }
}

async fn sync_with_retries<F: PageFetcher>(
    harvester: &Harvester<F>,
    book: &Book,
    token: &CancellationToken,
    progress: &watch::Sender<CrawlProgress>,
) -> Option<Book> {
    let config = harvester.config();
    let attempts = config.sync.retry_attempts.max(1);
    let delay = Duration::from_millis(config.sync.retry_delay_ms);
    let report = |p: CrawlProgress| {
        progress.send_replace(p);
    };

    for attempt in 1..=attempts {
        let result = harvester
            .try_sync_incremental(book, config.crawler.sync_max_pages, Some(&report), Some(token))
            .await;

        match result {
            Ok(updated) => return Some(updated),
            Err(HarvestError::Cancelled) => return None,
            Err(e @ HarvestError::MissingEntryUrl { .. }) => {
                tracing::warn!("Sync of \"{}\" not possible: {}", book.title, e);
                return None;
            }
            Err(e) => {
                tracing::debug!(
                    "Sync attempt {}/{} of \"{}\" failed: {}",
                    attempt,
                    attempts,
                    book.title,
                    e
                );
            }
        }

        if attempt < attempts {
            tokio::select! {
                _ = token.cancelled() => return None,
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    tracing::warn!(
        "Giving up sync of \"{}\" after {} attempts",
        book.title,
        attempts
    );
    None
}
