//! Novel-Harvest: heuristic novel catalog crawler and chapter extractor
//!
//! This crate discovers a book's chapter list from unstructured catalog pages,
//! extends that list incrementally as new chapters are published, and retrieves
//! readable chapter text by following in-page pagination links.

pub mod book;
pub mod classify;
pub mod config;
pub mod content;
pub mod crawler;
pub mod fetcher;
pub mod harvester;
pub mod jobs;
pub mod logging;
pub mod text;
pub mod url;

use thiserror::Error;

/// Main error type for Novel-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Book {book_id} has no catalog or text URL")]
    MissingEntryUrl { book_id: String },

    #[error("No catalog page could be fetched from {url}")]
    CatalogUnavailable { url: String },

    #[error("Operation cancelled")]
    Cancelled,
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid CSS selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Page retrieval errors
///
/// Every variant is a soft failure: callers treat it as "page unavailable".
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Empty body from {url}")]
    EmptyBody { url: String },

    #[error("All {attempts} candidates failed for {url}: {last}")]
    Exhausted {
        url: String,
        attempts: usize,
        last: String,
    },
}

/// Result type alias for Novel-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use book::{chapter_identity, Book, Chapter};
pub use config::HarvestConfig;
pub use content::ChapterText;
pub use crawler::{CrawlOutcome, CrawlProgress};
pub use fetcher::{FetchedPage, HttpFetcher, PageFetcher};
pub use harvester::Harvester;
pub use jobs::SyncRegistry;
pub use url::CatalogScope;
