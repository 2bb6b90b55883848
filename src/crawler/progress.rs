use serde::Serialize;

/// One progress report of a catalog crawl
///
/// `scanned_pages` never decreases within one crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlProgress {
    pub scanned_pages: usize,
    pub total_pages: usize,
    pub found_chapters: usize,
}

impl CrawlProgress {
    /// Fraction of the page budget consumed, in `0.0..=1.0`
    pub fn fraction(&self) -> f32 {
        if self.total_pages == 0 {
            return 0.0;
        }
        (self.scanned_pages as f32 / self.total_pages as f32).min(1.0)
    }
}

/// Callback receiving progress after every processed page
///
/// The callback may borrow state of the caller for `'a`.
pub type ProgressFn<'a> = dyn Fn(CrawlProgress) + Send + Sync + 'a;
