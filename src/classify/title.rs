//! Chapter title rules

use regex::Regex;
use std::sync::LazyLock;

/// One named title pattern
#[derive(Debug)]
pub struct TitleRule {
    /// Short rule name, used in debug logs
    pub name: &'static str,

    /// Special sections may live outside the book's normal chapter path
    pub special: bool,

    pattern: Regex,
}

impl TitleRule {
    fn new(name: &'static str, pattern: &str, special: bool) -> Self {
        Self {
            name,
            special,
            pattern: Regex::new(pattern).unwrap(),
        }
    }

    /// Returns true when the trimmed title matches this rule
    pub fn matches(&self, title: &str) -> bool {
        self.pattern.is_match(title)
    }
}

static TITLE_RULES: LazyLock<Vec<TitleRule>> = LazyLock::new(|| {
    vec![
        TitleRule::new("ordinal", r"第.{0,15}?[章节節回]", false),
        TitleRule::new(
            "english",
            r"(?i)^chapter(?:\s+[\p{L}\p{N}]+|\s*\d+)",
            false,
        ),
        TitleRule::new(
            "special",
            r"(?i)番外|后记|後記|尾声|尾聲|终章|終章|大结局|大結局|完本感言|完结感言|完結感言|afterword|epilogue|extra\s*chapter|side\s*story|finale",
            true,
        ),
        TitleRule::new("front-matter", r"(?i)^(?:楔子|序章|序言|引子|prologue)", false),
        TitleRule::new("themed", r"^[\p{Han}\p{N}]{1,8}篇(?:[\s:：·\-—_]|$)", false),
        TitleRule::new("numbered", r"^\d{1,5}\s*[.．、\-_]\s*\S", false),
    ]
});

/// The full ordered rule table
pub fn title_rules() -> &'static [TitleRule] {
    &TITLE_RULES
}

/// First rule matching the title, if any
pub fn matching_title_rule(title: &str) -> Option<&'static TitleRule> {
    let title = title.trim();
    TITLE_RULES.iter().find(|rule| rule.matches(title))
}

/// Returns true when the text reads like a chapter title
///
/// # Examples
///
/// ```
/// use novel_harvest::classify::is_chapter_title;
///
/// assert!(is_chapter_title("第十二章 风起云涌"));
/// assert!(is_chapter_title("Chapter 7: The Gate"));
/// assert!(!is_chapter_title("加入书架"));
/// ```
pub fn is_chapter_title(title: &str) -> bool {
    matching_title_rule(title).is_some()
}

/// Returns true for afterword / extra-chapter style section titles
pub fn is_special_chapter_title(title: &str) -> bool {
    let title = title.trim();
    TITLE_RULES
        .iter()
        .filter(|rule| rule.special)
        .any(|rule| rule.matches(title))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_titles() {
        assert!(is_chapter_title("第1章 开始"));
        assert!(is_chapter_title("第一百二十三章"));
        assert!(is_chapter_title("第 3 回 夜探"));
        assert!(is_chapter_title("卷一 第五节"));
        assert!(!is_chapter_title("第一卷"));
    }

    #[test]
    fn test_english_titles() {
        assert!(is_chapter_title("Chapter 12"));
        assert!(is_chapter_title("chapter XIV - Return"));
        assert!(is_chapter_title("Chapter One"));
        assert!(!is_chapter_title("Chapters"));
    }

    #[test]
    fn test_special_titles() {
        assert!(is_special_chapter_title("番外一 春日"));
        assert!(is_special_chapter_title("完本感言"));
        assert!(is_special_chapter_title("Epilogue"));
        assert!(is_special_chapter_title("Extra Chapter 2"));
        assert!(!is_special_chapter_title("第一章 开始"));
        assert!(is_chapter_title("尾声"));
    }

    #[test]
    fn test_front_matter_and_themed() {
        assert!(is_chapter_title("楔子"));
        assert!(is_chapter_title("Prologue"));
        assert!(is_chapter_title("青云篇 初入山门"));
        assert!(is_chapter_title("终局篇"));
        assert!(!is_chapter_title("这是一个很长很长的开头的篇章"));
    }

    #[test]
    fn test_numbered_titles() {
        assert!(is_chapter_title("12. 归来"));
        assert!(is_chapter_title("12-Title"));
        assert!(is_chapter_title("3、夜雨"));
        assert!(!is_chapter_title("123456. too long"));
    }

    #[test]
    fn test_navigation_rejected() {
        for text in ["首页", "加入书架", "下一页", "返回目录", "排行榜", "Next"] {
            assert!(!is_chapter_title(text), "{} should not be a title", text);
        }
    }

    #[test]
    fn test_rule_name_reported() {
        assert_eq!(matching_title_rule("第二章").map(|r| r.name), Some("ordinal"));
        assert_eq!(matching_title_rule("  后记 ").map(|r| r.name), Some("special"));
    }

    #[test]
    fn test_only_special_rule_flagged() {
        let special: Vec<&str> = title_rules()
            .iter()
            .filter(|r| r.special)
            .map(|r| r.name)
            .collect();
        assert_eq!(special, vec!["special"]);
    }
}
