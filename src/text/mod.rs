//! Text sanitizing and HTML-to-text conversion
//!
//! Every piece of chapter text leaving the crate passes through [`sanitize`].

mod html;
mod paragraphs;

pub use html::element_text_with_breaks;
pub use paragraphs::{outline, split_paragraphs, OutlineEntry};

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Ceiling on sanitized text length, in characters
pub const MAX_TEXT_CHARS: usize = 260_000;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Three or more newlines, allowing whitespace-only lines in between
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t\u{00A0}\u{3000}]*\n){2,}").unwrap());

/// Normalizes raw extracted text with the default length ceiling
///
/// # Examples
///
/// ```
/// use novel_harvest::text::sanitize;
///
/// let raw = "\u{FEFF}第一章\r\n\r\n\r\n\r\n<b>正文</b>&nbsp;&amp;  ";
/// assert_eq!(sanitize(raw), "第一章\n\n正文 &");
/// ```
pub fn sanitize(raw: &str) -> String {
    sanitize_with_limit(raw, MAX_TEXT_CHARS)
}

/// Normalizes raw extracted text
///
/// Removes the BOM, converts CRLF to LF, strips residual tags, unescapes
/// common entities, collapses runs of 3+ newlines to exactly 2, trims, and
/// caps the result at `max_chars` characters.
pub fn sanitize_with_limit(raw: &str, max_chars: usize) -> String {
    let text = raw
        .replace('\u{FEFF}', "")
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = unescape_entities(&text);
    let text = BLANK_RUN_RE.replace_all(&text, "\n\n");

    text.trim().chars().take(max_chars).collect()
}

/// Unescapes named and numeric HTML entities in one pass
pub fn unescape_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            decode_entity(body).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

fn decode_entity(body: &str) -> Option<String> {
    if let Some(hex) = body
        .strip_prefix("#x")
        .or_else(|| body.strip_prefix("#X"))
    {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }
    if let Some(dec) = body.strip_prefix('#') {
        return dec
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(String::from);
    }

    let named = match body {
        "nbsp" | "ensp" | "emsp" => " ",
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "hellip" => "…",
        "mdash" => "—",
        "ndash" => "–",
        "ldquo" => "“",
        "rdquo" => "”",
        "lsquo" => "‘",
        "rsquo" => "’",
        "middot" => "·",
        _ => return None,
    };
    Some(named.to_string())
}
