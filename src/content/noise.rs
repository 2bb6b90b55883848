use crate::ConfigError;
use regex::Regex;

/// Removes site watermark and advert lines from chapter text
#[derive(Debug, Clone, Default)]
pub struct NoiseFilter {
    patterns: Vec<Regex>,
}

impl NoiseFilter {
    /// Compiles the configured line patterns
    pub fn new(patterns: &[String]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| ConfigError::InvalidPattern(format!("{}: {}", p, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Drops every line whose trimmed text matches a pattern
    pub fn strip(&self, text: &str) -> String {
        if self.patterns.is_empty() {
            return text.to_string();
        }
        text.split('\n')
            .filter(|line| {
                let line = line.trim();
                line.is_empty() || !self.patterns.iter().any(|p| p.is_match(line))
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContentConfig;

    #[test]
    fn test_default_patterns_strip_watermarks() {
        let filter = NoiseFilter::new(&ContentConfig::default().noise_patterns).unwrap();
        let text = "正文第一段\n一秒记住【某某小说网】\n正文第二段\n本章未完，请点击下一页继续阅读\n\n尾段";
        assert_eq!(filter.strip(text), "正文第一段\n正文第二段\n\n尾段");
    }

    #[test]
    fn test_invalid_pattern() {
        let result = NoiseFilter::new(&["(".to_string()]);
        assert!(matches!(result, Err(ConfigError::InvalidPattern(_))));
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let filter = NoiseFilter::default();
        assert_eq!(filter.strip("a\nb"), "a\nb");
    }
}
