//! Catalog crawler
//!
//! This module contains the chapter-list discovery logic, including:
//! - Chapter extraction from anchors, `<option>` lists and inline scripts
//! - Catalog pagination discovery and page-hint ordering
//! - Tail-seeking for incremental sync of known books
//! - Per-crawl state with early termination and page budgets

mod catalog;
mod extract;
mod pagination;
mod progress;
mod state;

pub use catalog::{CatalogCrawler, CrawlOutcome, CrawlRequest};
pub use extract::extract_page_chapters;
pub use pagination::{page_hint, page_number};
pub use progress::{CrawlProgress, ProgressFn};

pub(crate) use extract::extract_from_document;
