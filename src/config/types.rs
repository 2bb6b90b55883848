use serde::Deserialize;

/// Main configuration structure for Novel-Harvest
///
/// Every section is optional; missing sections and keys fall back to the
/// built-in defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub fetcher: FetcherConfig,
    pub crawler: CrawlerConfig,
    pub content: ContentConfig,
    pub sync: SyncConfig,
    #[serde(rename = "site")]
    pub sites: Vec<SiteEntry>,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherConfig::default(),
            crawler: CrawlerConfig::default(),
            content: ContentConfig::default(),
            sync: SyncConfig::default(),
            sites: default_sites(),
        }
    }
}

/// HTTP fetching configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Accept-Language header sent with every request
    pub accept_language: String,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Read timeout in seconds
    pub read_timeout_secs: u64,

    /// Whether to try scheme/www/mobile host variants after the original URL fails
    pub try_host_variants: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Linux; Android 13) NovelHarvest/1.0".to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
            connect_timeout_secs: 15,
            read_timeout_secs: 20,
            try_host_variants: true,
        }
    }
}

/// Catalog crawl configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Page budget for the multi-page fallback during first import
    pub import_max_pages: usize,

    /// Page budget for incremental (background) sync
    pub sync_max_pages: usize,

    /// Assumed chapters per catalog page when estimating tail pages
    pub chapters_per_page: usize,

    /// Crawls yielding fewer chapters than this are treated as "not found"
    pub min_chapters: usize,

    /// Consecutive pages without new chapters that stop an incremental crawl
    pub stale_page_limit: usize,

    /// Shortest anchor text considered as a chapter title
    pub min_title_chars: usize,

    /// Longest anchor text considered as a chapter title
    pub max_title_chars: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            import_max_pages: 8,
            sync_max_pages: 120,
            chapters_per_page: 50,
            min_chapters: 6,
            stale_page_limit: 3,
            min_title_chars: 2,
            max_title_chars: 40,
        }
    }
}

/// Chapter content extraction configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ContentConfig {
    /// Maximum number of "next page" hops within one chapter
    pub max_pages_per_chapter: usize,

    /// Ceiling on sanitized text length, in characters
    pub max_text_chars: usize,

    /// Generic container selectors tried when no site entry matches
    pub generic_selectors: Vec<String>,

    /// Regexes for site watermark lines removed from chapter text
    pub noise_patterns: Vec<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            max_pages_per_chapter: 12,
            max_text_chars: 260_000,
            generic_selectors: [
                "article",
                "#content",
                ".content",
                "#chaptercontent",
                ".article",
                ".chapter",
                ".read-content",
                "#txt",
                "main",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            noise_patterns: [
                r"^.{0,12}一秒记住.*$",
                r"^.*请收藏本站.*$",
                r"^.*最新网址[:：].*$",
                r"^.*本章未完.{0,12}点击下一页.*$",
                r"^.*手机用户请浏览.*$",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

/// Background sync job configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SyncConfig {
    /// Maximum number of books refreshed concurrently
    pub max_concurrent_refreshes: usize,

    /// Attempts made by a background sync before giving up
    pub retry_attempts: u32,

    /// Delay between background sync attempts (milliseconds)
    pub retry_delay_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_concurrent_refreshes: 3,
            retry_attempts: 20,
            retry_delay_ms: 1800,
        }
    }
}

/// A known host family: its display label and preferred content containers
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SiteEntry {
    /// Human label for the source site
    pub name: String,

    /// Substrings matched against the lowercase host
    pub host_contains: Vec<String>,

    /// Content container selectors, most specific first
    #[serde(default)]
    pub content_selectors: Vec<String>,
}

fn site(name: &str, hosts: &[&str], selectors: &[&str]) -> SiteEntry {
    SiteEntry {
        name: name.to_string(),
        host_contains: hosts.iter().map(|s| s.to_string()).collect(),
        content_selectors: selectors.iter().map(|s| s.to_string()).collect(),
    }
}

/// Built-in host table
pub fn default_sites() -> Vec<SiteEntry> {
    vec![
        site(
            "笔趣阁",
            &["biqu"],
            &["#content", "#chaptercontent", ".content", "#booktxt"],
        ),
        site(
            "八一中文网",
            &["81zw", "zw81"],
            &["#content", ".article-content", ".content", "#txt"],
        ),
        site(
            "爱思路客",
            &["aisiluoke", "siluke"],
            &["#chaptercontent", "#content", ".txt", ".content"],
        ),
    ]
}
