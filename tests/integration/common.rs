//! Shared fixtures for the integration tests

use novel_harvest::{Book, Chapter, HarvestConfig, Harvester};
use std::ops::RangeInclusive;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Catalog path used by every scenario
pub const CATALOG_PATH: &str = "/book/12345/";

/// Configuration tuned for a local mock server
pub fn test_config() -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.fetcher.try_host_variants = false;
    config.fetcher.connect_timeout_secs = 5;
    config.fetcher.read_timeout_secs = 5;
    config.sync.retry_attempts = 2;
    config.sync.retry_delay_ms = 10;
    config
}

pub fn harvester() -> Harvester {
    Harvester::new(test_config()).expect("Failed to build harvester")
}

pub fn chapter_title(i: usize) -> String {
    format!("第{}章 标题{}", i, i)
}

/// Catalog page listing `chapters`, optionally linking a next catalog page
pub fn catalog_html(title: &str, chapters: RangeInclusive<usize>, next: Option<&str>) -> String {
    let mut html = format!(
        "<html><head><title>{}</title></head><body><div class=\"info\">作者：青灯</div><dl>",
        title
    );
    for i in chapters {
        html.push_str(&format!(
            "<dd><a href=\"{}{}.html\">{}</a></dd>",
            CATALOG_PATH,
            i,
            chapter_title(i)
        ));
    }
    html.push_str("</dl>");
    if let Some(next) = next {
        html.push_str(&format!("<a href=\"{}\">下一页</a>", next));
    }
    html.push_str("</body></html>");
    html
}

/// Chapter page with one content container and optional next-page link
pub fn chapter_html(text: &str, next: Option<&str>) -> String {
    let link = next
        .map(|n| format!("<a id=\"pb_next\" href=\"{}\">下一页</a>", n))
        .unwrap_or_default();
    format!(
        "<html><body><div class=\"nav\"><a href=\"{}\">目录</a></div><div id=\"content\">{}</div>{}</body></html>",
        CATALOG_PATH, text, link
    )
}

pub fn html_response(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into().into_bytes(), "text/html; charset=utf-8")
}

/// Serves `body` at `page_path`, expecting exactly `hits` requests
pub async fn mount_page(server: &MockServer, page_path: &str, body: String, hits: u64) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(html_response(body))
        .expect(hits)
        .mount(server)
        .await;
}

pub fn catalog_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), CATALOG_PATH)
}

/// A previously imported book pointing at the mock catalog
pub fn known_book(server: &MockServer, chapters: RangeInclusive<usize>) -> Book {
    let catalog = catalog_url(server);
    let chapters: Vec<Chapter> = chapters
        .map(|i| Chapter::new(chapter_title(i), format!("{}{}.html", catalog, i)))
        .collect();
    Book {
        id: novel_harvest::book::book_id(&catalog),
        title: "长夜行".to_string(),
        author: "青灯".to_string(),
        cover_url: None,
        description: None,
        text_url: chapters.first().map(|c| c.url.clone()),
        catalog_url: Some(catalog),
        chapters,
        source: "网页导入".to_string(),
    }
}
