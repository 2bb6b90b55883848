//! Response body decoding
//!
//! Resolution order: HTTP header charset, then a `<meta charset>` found in a
//! Latin-1 probe of the document head, then UTF-8. A UTF-8 decode that
//! produces replacement characters is retried as GB18030.

use encoding_rs::{Encoding, GB18030, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Bytes of the document scanned for a meta charset declaration
const META_PROBE_BYTES: usize = 4096;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-z0-9_\-:.]+)"#).unwrap()
});

/// Extracts the `charset` parameter from a Content-Type header value
pub fn header_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if name.trim().eq_ignore_ascii_case("charset") {
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
            (!value.is_empty()).then(|| value.to_string())
        } else {
            None
        }
    })
}

/// Finds a `<meta charset=...>` or `http-equiv` charset in the document head
pub fn meta_charset(bytes: &[u8]) -> Option<String> {
    // Latin-1 maps every byte to one char, so ASCII markup survives any encoding.
    let probe: String = bytes
        .iter()
        .take(META_PROBE_BYTES)
        .map(|&b| b as char)
        .collect();
    META_CHARSET_RE
        .captures(&probe)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decodes a response body to text
///
/// # Arguments
///
/// * `bytes` - Raw response body
/// * `content_type` - Content-Type header value, if the response had one
///
/// # Examples
///
/// ```
/// use novel_harvest::fetcher::decode_body;
///
/// let (gbk, _, _) = encoding_rs::GB18030.encode("第一章 风起");
/// assert_eq!(decode_body(&gbk, Some("text/html")), "第一章 风起");
/// ```
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let declared = content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(bytes))
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()));

    let encoding = declared.unwrap_or(UTF_8);
    let (text, actual, had_errors) = encoding.decode(bytes);

    if had_errors && actual == UTF_8 {
        tracing::debug!("UTF-8 decode produced replacement characters, retrying as GB18030");
        let (fallback, _, _) = GB18030.decode(bytes);
        return fallback.into_owned();
    }

    text.into_owned()
}
