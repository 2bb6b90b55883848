//! Content container selection
//!
//! Site selectors are tried first, in order, and the first non-blank one
//! wins. Otherwise every generic candidate is scored by text length with a
//! penalty for link-heavy text, and the best positive score wins. The page
//! body is the last resort.

use crate::content::sites::SiteTable;
use crate::text::element_text_with_breaks;
use scraper::{ElementRef, Html, Selector};

/// Weight of the link-density penalty
const LINK_PENALTY: f64 = 1.5;

/// Scores a candidate container: text length minus a link-density penalty
///
/// A container whose text is mostly link text (navigation, "related books"
/// blocks) scores at or below zero.
pub fn container_score(element: ElementRef<'_>, text: &str) -> f64 {
    let text_len = text.chars().filter(|c| !c.is_whitespace()).count() as f64;
    if text_len == 0.0 {
        return 0.0;
    }

    let mut link_len = 0usize;
    if let Ok(selector) = Selector::parse("a") {
        for link in element.select(&selector) {
            link_len += link
                .text()
                .flat_map(str::chars)
                .filter(|c| !c.is_whitespace())
                .count();
        }
    }

    let density = (link_len as f64 / text_len).min(1.0);
    text_len - text_len * density * LINK_PENALTY
}

/// Picks the most likely prose container and flattens it to text
///
/// # Arguments
///
/// * `document` - Parsed chapter page
/// * `host` - Host the page was served from
/// * `sites` - Host table with per-site selectors
/// * `generic_selectors` - Candidates scored when no site selector matches
pub fn readable_text(
    document: &Html,
    host: &str,
    sites: &SiteTable,
    generic_selectors: &[String],
) -> String {
    for selector_str in sites.content_selectors(host) {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = element_text_with_breaks(element);
                if !text.trim().is_empty() {
                    tracing::trace!("Content container {} (site rule)", selector_str);
                    return text;
                }
            }
        }
    }

    let mut best: Option<(f64, String)> = None;
    for selector_str in generic_selectors {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let text = element_text_with_breaks(element);
            let score = container_score(element, &text);
            if score > 0.0 && best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, text));
            }
        }
    }
    if let Some((score, text)) = best {
        tracing::trace!("Content container chosen by score {:.1}", score);
        return text;
    }

    if let Ok(selector) = Selector::parse("body") {
        if let Some(body) = document.select(&selector).next() {
            return element_text_with_breaks(body);
        }
    }
    String::new()
}
