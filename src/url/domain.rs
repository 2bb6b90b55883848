/// Second-level labels that act as public suffixes under a country code
const COMPOUND_SUFFIX_LABELS: &[&str] = &["com", "net", "org", "gov", "edu", "co", "ac"];

/// Reduces a host to its registrable root domain
///
/// `m.biquge.com` and `www.biquge.com` both become `biquge.com`;
/// `www.xs.com.cn` becomes `xs.com.cn`. IP addresses and single-label
/// hosts are returned unchanged.
///
/// # Examples
///
/// ```
/// use novel_harvest::url::root_domain;
///
/// assert_eq!(root_domain("m.example.com"), "example.com");
/// assert_eq!(root_domain("www.book.com.cn"), "book.com.cn");
/// assert_eq!(root_domain("127.0.0.1"), "127.0.0.1");
/// ```
pub fn root_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();
    if is_ip_literal(&host) {
        return host;
    }

    let labels: Vec<&str> = host.split('.').filter(|l| !l.is_empty()).collect();
    if labels.len() <= 2 {
        return labels.join(".");
    }

    let tld = labels[labels.len() - 1];
    let second = labels[labels.len() - 2];
    let keep = if tld.len() == 2 && COMPOUND_SUFFIX_LABELS.contains(&second) {
        3
    } else {
        2
    };

    labels[labels.len() - keep.min(labels.len())..].join(".")
}

/// Returns true when `host` is the root domain itself or one of its subdomains
pub fn is_same_site(host: &str, root: &str) -> bool {
    let host = host.to_lowercase();
    if root.is_empty() {
        return false;
    }
    host == root || host.ends_with(&format!(".{}", root))
}

/// Returns true for IPv4/IPv6 literals and `localhost`
pub fn is_ip_literal(host: &str) -> bool {
    let host = host.trim_start_matches('[').trim_end_matches(']');
    host == "localhost" || host.parse::<std::net::IpAddr>().is_ok()
}
