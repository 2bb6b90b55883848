//! URL handling module for Novel-Harvest
//!
//! This module provides URL normalization, visited-set keys, root-domain
//! derivation, link resolution and the per-catalog book scope.

mod domain;
mod normalize;
mod scope;

pub use domain::{is_ip_literal, is_same_site, root_domain};
pub use normalize::{normalize_url, visit_key};
pub use scope::CatalogScope;

pub(crate) use scope::is_listing_segment;

use url::Url;

/// Resolves a link href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    absolute.set_fragment(None);
    Some(absolute)
}

/// Returns true when both URLs have the same host (case-insensitive)
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(x), Some(y)) => x.eq_ignore_ascii_case(y),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/book/1/").unwrap()
    }

    #[test]
    fn test_resolve_relative_link() {
        let resolved = resolve_link("2.html", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/book/1/2.html");
    }

    #[test]
    fn test_resolve_root_relative_link() {
        let resolved = resolve_link("/book/1/3.html#top", &base_url()).unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/book/1/3.html");
    }

    #[test]
    fn test_skip_special_schemes() {
        assert!(resolve_link("javascript:void(0)", &base_url()).is_none());
        assert!(resolve_link("JavaScript:void(0)", &base_url()).is_none());
        assert!(resolve_link("mailto:a@example.com", &base_url()).is_none());
        assert!(resolve_link("tel:+123", &base_url()).is_none());
        assert!(resolve_link("data:text/html,hi", &base_url()).is_none());
        assert!(resolve_link("#section", &base_url()).is_none());
        assert!(resolve_link("   ", &base_url()).is_none());
    }

    #[test]
    fn test_skip_non_http_after_resolution() {
        assert!(resolve_link("ftp://example.com/file", &base_url()).is_none());
    }

    #[test]
    fn test_same_host() {
        let a = Url::parse("https://Example.com/a").unwrap();
        let b = Url::parse("http://example.com/b").unwrap();
        let c = Url::parse("http://m.example.com/b").unwrap();
        assert!(same_host(&a, &b));
        assert!(!same_host(&a, &c));
    }
}
