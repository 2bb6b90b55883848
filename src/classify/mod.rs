//! Chapter-link classification
//!
//! Title and URL heuristics are kept as small rule tables; [`ChapterLinkFilter`]
//! combines them with the book scope to decide whether one anchor is a chapter.

mod links;
mod pagination;
mod title;

pub use links::{is_chapter_url, looks_like_catalog_url};
pub use pagination::{is_chapter_navigation_text, is_pagination_text, looks_like_pagination_url};
pub use title::{
    is_chapter_title, is_special_chapter_title, matching_title_rule, title_rules, TitleRule,
};

use crate::config::CrawlerConfig;
use crate::url::{visit_key, CatalogScope};
use url::Url;

/// Decides whether a (title, url) pair found on one page is a chapter link
#[derive(Debug, Clone, Copy)]
pub struct ChapterLinkFilter<'a> {
    scope: &'a CatalogScope,
    base: &'a Url,
    min_title_chars: usize,
    max_title_chars: usize,
}

impl<'a> ChapterLinkFilter<'a> {
    /// Creates a filter for links found on `base`
    pub fn new(scope: &'a CatalogScope, base: &'a Url, config: &CrawlerConfig) -> Self {
        Self {
            scope,
            base,
            min_title_chars: config.min_title_chars,
            max_title_chars: config.max_title_chars,
        }
    }

    /// Returns true when the pair should be kept as a chapter
    pub fn accepts(&self, title: &str, url: &Url) -> bool {
        let title = title.trim();
        let chars = title.chars().count();
        if chars < self.min_title_chars || chars > self.max_title_chars {
            return false;
        }

        let Some(rule) = matching_title_rule(title) else {
            return false;
        };

        if !self.scope.allows_host(url) || looks_like_catalog_url(url) {
            return false;
        }
        if visit_key(url) == visit_key(self.base) {
            return false;
        }

        if rule.special || is_special_chapter_title(title) {
            return true;
        }

        self.scope.allows_path(url)
            && (is_chapter_url(url, self.base) || links::last_segment_has_digit(url))
    }
}
