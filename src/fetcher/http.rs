//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests, including:
//! - Building the HTTP client with user agent, language and timeouts
//! - Trying host variants until one returns a usable body
//! - Decoding bodies with header/meta/heuristic charset detection
//! - Error classification

use crate::config::FetcherConfig;
use crate::fetcher::charset::decode_body;
use crate::fetcher::variants::host_variants;
use crate::fetcher::{FetchedPage, PageFetcher};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Fetcher backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    try_variants: bool,
}

impl HttpFetcher {
    /// Creates a fetcher from the fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            try_variants: config.try_host_variants,
        })
    }

    /// Performs one GET against a single candidate URL
    async fn fetch_once(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| classify_error(url, e))?;
        let body = decode_body(&bytes, content_type.as_deref());

        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        Ok(FetchedPage {
            url: final_url,
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let candidates = if self.try_variants {
            host_variants(url)
        } else {
            vec![url.clone()]
        };

        let attempts = candidates.len();
        let mut last_error = None;

        for candidate in &candidates {
            match self.fetch_once(candidate).await {
                Ok(page) => {
                    tracing::debug!("Fetched {} ({} chars)", page.url, page.body.len());
                    return Ok(page);
                }
                Err(e) => {
                    tracing::debug!("Candidate {} failed: {}", candidate, e);
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if attempts == 1 => Err(e),
            Some(e) => Err(FetchError::Exhausted {
                url: url.to_string(),
                attempts,
                last: e.to_string(),
            }),
            None => Err(FetchError::InvalidUrl(url.to_string())),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Example
///
/// ```no_run
/// use novel_harvest::config::FetcherConfig;
/// use novel_harvest::fetcher::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml;q=0.9,*/*;q=0.8"),
    );
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .timeout(Duration::from_secs(
            config.connect_timeout_secs + config.read_timeout_secs,
        ))
        .redirect(Policy::limited(5))
        .gzip(true)
        .brotli(true)
        .build()
}

fn classify_error(url: &Url, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&FetcherConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_with_odd_language_header() {
        let config = FetcherConfig {
            accept_language: "zh\nCN".to_string(),
            ..FetcherConfig::default()
        };
        assert!(HttpFetcher::new(&config).is_ok());
    }
}
