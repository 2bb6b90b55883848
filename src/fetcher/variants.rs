use crate::url::is_ip_literal;
use url::Url;

/// Builds the ordered list of URLs to try for one fetch
///
/// The original URL always comes first, followed by the other scheme, the
/// `www.`-toggled host on both schemes, and finally the `m.` mobile host.
/// IP literals and `localhost` only get the scheme toggle.
///
/// # Examples
///
/// ```
/// use novel_harvest::fetcher::host_variants;
/// use url::Url;
///
/// let url = Url::parse("https://www.example.com/book/1/").unwrap();
/// let variants: Vec<String> = host_variants(&url).iter().map(|u| u.to_string()).collect();
/// assert_eq!(variants[0], "https://www.example.com/book/1/");
/// assert_eq!(variants[1], "http://www.example.com/book/1/");
/// assert!(variants.contains(&"https://example.com/book/1/".to_string()));
/// assert!(variants.contains(&"https://m.example.com/book/1/".to_string()));
/// ```
pub fn host_variants(url: &Url) -> Vec<Url> {
    let mut variants = vec![url.clone()];

    let Some(host) = url.host_str().map(|h| h.to_lowercase()) else {
        return variants;
    };

    let other_scheme = if url.scheme() == "https" {
        "http"
    } else {
        "https"
    };
    let schemes = [url.scheme().to_string(), other_scheme.to_string()];

    let mut hosts = vec![host.clone()];
    if !is_ip_literal(&host) {
        let bare = host
            .strip_prefix("www.")
            .or_else(|| host.strip_prefix("m."))
            .unwrap_or(&host)
            .to_string();
        hosts.push(if host.starts_with("www.") {
            bare.clone()
        } else {
            format!("www.{}", bare)
        });
        if !host.starts_with("m.") {
            hosts.push(format!("m.{}", bare));
        } else {
            hosts.push(bare.clone());
        }
    }

    for candidate_host in &hosts {
        for scheme in &schemes {
            let Some(candidate) = with_scheme_and_host(url, scheme, candidate_host) else {
                continue;
            };
            if !variants.contains(&candidate) {
                variants.push(candidate);
            }
        }
    }

    variants
}

fn with_scheme_and_host(url: &Url, scheme: &str, host: &str) -> Option<Url> {
    let mut candidate = url.clone();
    candidate.set_scheme(scheme).ok()?;
    candidate.set_host(Some(host)).ok()?;
    Some(candidate)
}
