use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Single-line bodies longer than this are split on sentence terminators
const SINGLE_LINE_SPLIT_CHARS: usize = 120;

/// Longest outline title kept, in characters
const OUTLINE_TITLE_CHARS: usize = 32;

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:第[\p{L}\p{N}零一二三四五六七八九十百千两0-9]{1,12}[章节回卷集部篇].*|Chapter\s+[\p{L}\p{N}IVXLC0-9]+.*)$",
    )
    .unwrap()
});

fn is_sentence_end(c: char) -> bool {
    matches!(c, '。' | '！' | '？' | '!' | '?' | '；' | ';')
}

/// Splits chapter text into display paragraphs
///
/// Multi-line text yields its trimmed non-blank lines. A single long line is
/// split after sentence terminators and regrouped two sentences at a time.
///
/// # Examples
///
/// ```
/// use novel_harvest::text::split_paragraphs;
///
/// assert_eq!(split_paragraphs("  一\n\n 二 \n"), vec!["一", "二"]);
/// ```
pub fn split_paragraphs(content: &str) -> Vec<String> {
    let lines: Vec<String> = content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if lines.len() != 1 || lines[0].chars().count() <= SINGLE_LINE_SPLIT_CHARS {
        return lines;
    }

    let mut sentences = Vec::new();
    let mut current = String::new();
    for c in lines[0].chars() {
        current.push(c);
        if is_sentence_end(c) {
            sentences.push(std::mem::take(&mut current));
        }
    }
    sentences.push(current);

    let sentences: Vec<&str> = sentences
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    sentences.chunks(2).map(|pair| pair.concat()).collect()
}

/// A navigation point inside one chapter's text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineEntry {
    pub title: String,
    pub paragraph_index: usize,
}

/// Builds an in-text outline from heading-like paragraphs
///
/// Paragraphs shaped like `第…章` or `Chapter N` become entries. Without any,
/// fixed-size sections named `第N节` are emitted instead, with larger steps for
/// very long text.
pub fn outline(content: &str, paragraphs: &[String]) -> Vec<OutlineEntry> {
    if paragraphs.is_empty() {
        return Vec::new();
    }

    let detected: Vec<OutlineEntry> = paragraphs
        .iter()
        .enumerate()
        .filter_map(|(index, line)| {
            let title = line.trim();
            HEADING_RE.is_match(title).then(|| OutlineEntry {
                title: title.chars().take(OUTLINE_TITLE_CHARS).collect(),
                paragraph_index: index,
            })
        })
        .collect();
    if !detected.is_empty() {
        return detected;
    }

    let step = match content.chars().count() {
        n if n > 180_000 => 80,
        n if n > 100_000 => 65,
        _ => 50,
    };

    (0..paragraphs.len())
        .step_by(step)
        .enumerate()
        .map(|(n, paragraph_index)| OutlineEntry {
            title: format!("第{}节", n + 1),
            paragraph_index,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multi_line_split() {
        let paragraphs = split_paragraphs("第一段\n\n  第二段  \n第三段");
        assert_eq!(paragraphs, vec!["第一段", "第二段", "第三段"]);
    }

    #[test]
    fn test_short_single_line_kept() {
        assert_eq!(split_paragraphs("就一句。"), vec!["就一句。"]);
        assert!(split_paragraphs("   ").is_empty());
    }

    #[test]
    fn test_long_single_line_regrouped() {
        let line = "这是一个比较长的句子，用来凑够长度。".repeat(10);
        let paragraphs = split_paragraphs(&line);
        assert_eq!(paragraphs.len(), 5);
        assert!(paragraphs.iter().all(|p| p.ends_with('。')));
        assert_eq!(paragraphs.concat(), line);
    }

    #[test]
    fn test_outline_detects_headings() {
        let paragraphs: Vec<String> = ["第一章 开端", "正文", "第二章 转折", "Chapter 3 End"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let entries = outline("", &paragraphs);
        let indices: Vec<usize> = entries.iter().map(|e| e.paragraph_index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(entries[0].title, "第一章 开端");
    }

    #[test]
    fn test_outline_fallback_sections() {
        let paragraphs: Vec<String> = (0..120).map(|i| format!("段落{}", i)).collect();
        let entries = outline("短文", &paragraphs);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].title, "第2节");
        assert_eq!(entries[1].paragraph_index, 50);
    }

    #[test]
    fn test_outline_empty() {
        assert!(outline("", &[]).is_empty());
    }
}
