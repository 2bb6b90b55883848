//! Book and chapter records

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use url::Url;

/// Hex characters of the URL digest kept in a book id
const BOOK_ID_HEX_CHARS: usize = 16;

/// One entry of a book's chapter list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,
    pub url: String,
}

impl Chapter {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }

    /// Deduplication key of this chapter
    pub fn identity(&self) -> String {
        chapter_identity(&self.title, &self.url)
    }
}

/// Computes the deduplication key of a chapter
///
/// The key is the lower-cased title with whitespace and punctuation removed;
/// a title with nothing left falls back to the lower-cased URL path.
///
/// # Examples
///
/// ```
/// use novel_harvest::chapter_identity;
///
/// assert_eq!(chapter_identity("第1章 开始！", "https://a.com/1.html"), "第1章开始");
/// assert_eq!(chapter_identity("Chapter ONE", "https://a.com/1.html"), "chapterone");
/// assert_eq!(chapter_identity("……", "https://a.com/Book/1.html"), "/book/1.html");
/// ```
pub fn chapter_identity(title: &str, url: &str) -> String {
    let key: String = title
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();
    if !key.is_empty() {
        return key;
    }

    match Url::parse(url) {
        Ok(parsed) => parsed.path().to_lowercase(),
        Err(_) => url.trim().to_lowercase(),
    }
}

/// Derives the stable book id for an originating URL
pub fn book_id(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.trim().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("web:{}", &digest[..BOOK_ID_HEX_CHARS])
}

/// A book produced by import and extended by sync
///
/// Persistence belongs to the caller; this crate only creates and updates values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_url: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    pub source: String,
}

impl Book {
    /// Identity keys of every known chapter
    pub fn chapter_keys(&self) -> HashSet<String> {
        self.chapters.iter().map(Chapter::identity).collect()
    }

    /// Identity key of the last known chapter
    pub fn last_chapter_key(&self) -> Option<String> {
        self.chapters.last().map(Chapter::identity)
    }

    /// URL a sync should start from: the catalog if known, else the text page
    pub fn entry_url(&self) -> Option<&str> {
        let present = |u: &&str| !u.trim().is_empty();
        self.catalog_url
            .as_deref()
            .filter(present)
            .or_else(|| self.text_url.as_deref().filter(present))
    }
}
