//! Configuration module for Novel-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! All budgets and heuristic thresholds (page caps, the minimum chapter yield,
//! the early-stop run length) live here instead of being inlined in the crawler.
//!
//! # Example
//!
//! ```no_run
//! use novel_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Minimum chapter yield: {}", config.crawler.min_chapters);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    default_sites, ContentConfig, CrawlerConfig, FetcherConfig, HarvestConfig, SiteEntry,
    SyncConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
