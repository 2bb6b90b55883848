use crate::config::types::{
    ContentConfig, CrawlerConfig, FetcherConfig, HarvestConfig, SiteEntry, SyncConfig,
};
use crate::{ConfigError, ConfigResult};
use regex::Regex;
use scraper::Selector;

/// Validates the entire configuration
pub fn validate(config: &HarvestConfig) -> ConfigResult<()> {
    validate_fetcher_config(&config.fetcher)?;
    validate_crawler_config(&config.crawler)?;
    validate_content_config(&config.content)?;
    validate_sync_config(&config.sync)?;
    validate_sites(&config.sites)?;
    Ok(())
}

fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.connect_timeout_secs == 0 || config.read_timeout_secs == 0 {
        return Err(ConfigError::Validation(format!(
            "timeouts must be >= 1s, got connect={}s read={}s",
            config.connect_timeout_secs, config.read_timeout_secs
        )));
    }

    Ok(())
}

fn validate_crawler_config(config: &CrawlerConfig) -> ConfigResult<()> {
    if config.import_max_pages < 1 || config.sync_max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "page budgets must be >= 1, got import={} sync={}",
            config.import_max_pages, config.sync_max_pages
        )));
    }

    if config.chapters_per_page < 1 {
        return Err(ConfigError::Validation(
            "chapters_per_page must be >= 1".to_string(),
        ));
    }

    if config.min_chapters < 1 {
        return Err(ConfigError::Validation(
            "min_chapters must be >= 1".to_string(),
        ));
    }

    if config.stale_page_limit < 1 {
        return Err(ConfigError::Validation(
            "stale_page_limit must be >= 1".to_string(),
        ));
    }

    if config.min_title_chars > config.max_title_chars {
        return Err(ConfigError::Validation(format!(
            "min_title_chars ({}) exceeds max_title_chars ({})",
            config.min_title_chars, config.max_title_chars
        )));
    }

    Ok(())
}

fn validate_content_config(config: &ContentConfig) -> ConfigResult<()> {
    if config.max_pages_per_chapter < 1 {
        return Err(ConfigError::Validation(
            "max_pages_per_chapter must be >= 1".to_string(),
        ));
    }

    if config.max_text_chars < 1 {
        return Err(ConfigError::Validation(
            "max_text_chars must be >= 1".to_string(),
        ));
    }

    for selector in &config.generic_selectors {
        validate_selector(selector)?;
    }

    for pattern in &config.noise_patterns {
        Regex::new(pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", pattern, e)))?;
    }

    Ok(())
}

fn validate_sync_config(config: &SyncConfig) -> ConfigResult<()> {
    if config.max_concurrent_refreshes < 1 {
        return Err(ConfigError::Validation(
            "max_concurrent_refreshes must be >= 1".to_string(),
        ));
    }

    if config.retry_attempts < 1 {
        return Err(ConfigError::Validation(
            "retry_attempts must be >= 1".to_string(),
        ));
    }

    Ok(())
}

fn validate_sites(sites: &[SiteEntry]) -> ConfigResult<()> {
    for entry in sites {
        if entry.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site name cannot be empty".to_string(),
            ));
        }

        if entry.host_contains.iter().all(|h| h.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "Site '{}' must have at least one host pattern",
                entry.name
            )));
        }

        if entry.content_selectors.is_empty() {
            return Err(ConfigError::Validation(format!(
                "Site '{}' must have at least one content selector",
                entry.name
            )));
        }

        for selector in &entry.content_selectors {
            validate_selector(selector)?;
        }
    }

    Ok(())
}

fn validate_selector(selector: &str) -> ConfigResult<()> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidSelector {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })
}
