//! Per-crawl mutable state
//!
//! A [`CrawlState`] is created by one crawl call, owned by it, and dropped when
//! the call returns. Nothing in it is shared between crawls.

use crate::book::Chapter;
use crate::url::visit_key;
use std::collections::{HashMap, HashSet, VecDeque};
use url::Url;

/// A chapter with the position it was discovered at
#[derive(Debug, Clone)]
pub(crate) struct FoundChapter {
    pub chapter: Chapter,
    /// Catalog position of the page the chapter was found on
    pub page_number: u64,
    /// Global discovery order
    pub seq: usize,
}

/// What a page contributed to the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageContribution {
    /// Chapters not seen earlier in this crawl
    pub added: usize,
    /// Added chapters that were also unknown to the caller
    pub new_to_book: usize,
    /// Whether the caller's last known chapter appeared on this page
    pub saw_anchor: bool,
}

#[derive(Debug, Default)]
pub(crate) struct CrawlState {
    visited: HashSet<String>,
    queued: HashSet<String>,
    frontier: VecDeque<Url>,
    /// Catalog position of queued pages, by visit key
    page_orders: HashMap<String, u64>,
    chapters: Vec<FoundChapter>,
    chapter_keys: HashSet<String>,

    /// Dequeued attempts, successful or not
    pub pages: usize,
    pub pages_fetched_ok: usize,
    pub anchor_seen: bool,
    pub stale_streak: usize,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a URL unless it was already visited or queued
    pub fn enqueue(&mut self, url: Url) -> bool {
        let key = visit_key(&url);
        if self.visited.contains(&key) || !self.queued.insert(key) {
            return false;
        }
        self.frontier.push_back(url);
        true
    }

    /// Queues a URL with its position in the catalog
    ///
    /// The first position recorded for a URL wins.
    pub fn enqueue_at(&mut self, url: Url, order: u64) -> bool {
        self.page_orders.entry(visit_key(&url)).or_insert(order);
        self.enqueue(url)
    }

    /// Catalog position recorded for a URL when it was queued
    pub fn page_order(&self, url: &Url) -> Option<u64> {
        self.page_orders.get(&visit_key(url)).copied()
    }

    /// Pops the next URL that has not been visited yet and marks it visited
    pub fn next_url(&mut self) -> Option<Url> {
        while let Some(url) = self.frontier.pop_front() {
            let key = visit_key(&url);
            self.queued.remove(&key);
            if self.visited.insert(key) {
                return Some(url);
            }
        }
        None
    }

    /// Marks a URL visited without queueing it (redirect targets)
    pub fn mark_visited(&mut self, url: &Url) {
        let key = visit_key(url);
        self.queued.remove(&key);
        self.visited.insert(key);
    }

    pub fn is_known_url(&self, url: &Url) -> bool {
        let key = visit_key(url);
        self.visited.contains(&key) || self.queued.contains(&key)
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Merges one page's chapters, keeping the first occurrence of each key
    pub fn merge_page(
        &mut self,
        page_chapters: Vec<Chapter>,
        page_number: u64,
        known_keys: &HashSet<String>,
        last_known_key: Option<&str>,
    ) -> PageContribution {
        let mut contribution = PageContribution {
            added: 0,
            new_to_book: 0,
            saw_anchor: false,
        };

        for chapter in page_chapters {
            let key = chapter.identity();
            if last_known_key == Some(key.as_str()) {
                contribution.saw_anchor = true;
            }
            if !self.chapter_keys.insert(key.clone()) {
                continue;
            }

            contribution.added += 1;
            if !known_keys.contains(&key) {
                contribution.new_to_book += 1;
            }
            let seq = self.chapters.len();
            self.chapters.push(FoundChapter {
                chapter,
                page_number,
                seq,
            });
        }

        contribution
    }

    /// Updates the early-stop bookkeeping and returns true when the crawl should stop
    pub fn record_contribution(&mut self, contribution: PageContribution, stale_limit: usize) -> bool {
        if contribution.saw_anchor {
            self.anchor_seen = true;
        }
        if !self.anchor_seen {
            return false;
        }

        if contribution.new_to_book == 0 {
            self.stale_streak += 1;
        } else {
            self.stale_streak = 0;
        }
        stale_limit > 0 && self.stale_streak >= stale_limit
    }

    /// Consumes the state and returns chapters in final order
    ///
    /// Tail-seeking crawls visit pages out of order, so their chapters are
    /// re-sorted by catalog position before discovery order.
    pub fn into_chapters(self, by_page_number: bool) -> Vec<Chapter> {
        let mut found = self.chapters;
        if by_page_number {
            found.sort_by_key(|f| (f.page_number, f.seq));
        }
        found.into_iter().map(|f| f.chapter).collect()
    }
}
