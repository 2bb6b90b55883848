use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

static BR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static P_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p\s*>").unwrap());
static DIV_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</div\s*>").unwrap());
static NEWLINE_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n(?:[ \t]*\n){2,}").unwrap());

/// Flattens an element to text, keeping paragraph structure
///
/// `<br>` becomes a newline, `</p>` a blank line and `</div>` a newline
/// before the markup is dropped, so prose split across block elements keeps
/// its line breaks. Script and style contents are skipped.
pub fn element_text_with_breaks(element: ElementRef<'_>) -> String {
    let html = element.inner_html();
    let html = BR_RE.replace_all(&html, "\n");
    let html = P_CLOSE_RE.replace_all(&html, "</p>\n\n");
    let html = DIV_CLOSE_RE.replace_all(&html, "</div>\n");

    let fragment = Html::parse_fragment(&html);
    let mut text = String::with_capacity(html.len() / 2);

    for node in fragment.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
        });
        if !skipped {
            text.push_str(chunk);
        }
    }

    let text = text.replace('\u{00A0}', " ");
    NEWLINE_RUN_RE
        .replace_all(&text, "\n\n")
        .trim()
        .to_string()
}
