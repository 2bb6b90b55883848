//! Page fetching: URL to decoded HTML text
//!
//! The crawler, content extractor and importer only see the [`PageFetcher`]
//! trait; [`HttpFetcher`] is the network implementation.

mod charset;
mod http;
mod variants;

pub use charset::{decode_body, header_charset, meta_charset};
pub use http::{build_http_client, HttpFetcher};
pub use variants::host_variants;

use crate::FetchError;
use async_trait::async_trait;
use url::Url;

/// A successfully fetched and decoded page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the body was actually served from (after variants and redirects)
    pub url: Url,

    /// Decoded document text
    pub body: String,
}

/// Resolves a URL to decoded HTML
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches one page; any error means "page unavailable"
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

#[async_trait]
impl<T: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        (**self).fetch(url).await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::url::visit_key;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// In-memory page source keyed by visit key
    #[derive(Default)]
    pub struct MemoryFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MemoryFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_page(mut self, url: &str, body: impl Into<String>) -> Self {
            let parsed = Url::parse(url).unwrap();
            self.pages.insert(visit_key(&parsed), body.into());
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for MemoryFetcher {
        async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
            self.requests.lock().unwrap().push(url.to_string());
            match self.pages.get(&visit_key(url)) {
                Some(body) => Ok(FetchedPage {
                    url: url.clone(),
                    body: body.clone(),
                }),
                None => Err(FetchError::Status {
                    url: url.to_string(),
                    status: 404,
                }),
            }
        }
    }
}
