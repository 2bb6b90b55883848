use crate::config::SiteEntry;

/// Label used for hosts that match no site entry
pub const DEFAULT_SOURCE_LABEL: &str = "网页导入";

/// Host table: source labels and preferred content containers
#[derive(Debug, Clone, Default)]
pub struct SiteTable {
    sites: Vec<SiteEntry>,
}

impl SiteTable {
    pub fn new(sites: Vec<SiteEntry>) -> Self {
        Self { sites }
    }

    /// First entry whose host pattern occurs in `host`
    pub fn find(&self, host: &str) -> Option<&SiteEntry> {
        let host = host.to_lowercase();
        self.sites.iter().find(|site| {
            site.host_contains
                .iter()
                .any(|pattern| !pattern.is_empty() && host.contains(&pattern.to_lowercase()))
        })
    }

    /// Human label for the site serving `host`
    ///
    /// # Examples
    ///
    /// ```
    /// use novel_harvest::config::default_sites;
    /// use novel_harvest::content::SiteTable;
    ///
    /// let table = SiteTable::new(default_sites());
    /// assert_eq!(table.source_label("www.biquge.com"), "笔趣阁");
    /// assert_eq!(table.source_label("example.org"), "网页导入");
    /// ```
    pub fn source_label(&self, host: &str) -> &str {
        self.find(host)
            .map(|site| site.name.as_str())
            .unwrap_or(DEFAULT_SOURCE_LABEL)
    }

    /// Content selectors of the site serving `host`, most specific first
    pub fn content_selectors(&self, host: &str) -> &[String] {
        self.find(host)
            .map(|site| site.content_selectors.as_slice())
            .unwrap_or(&[])
    }
}
