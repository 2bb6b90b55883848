//! Configuration file loading

use crate::common::*;
use novel_harvest::config::load_config;
use novel_harvest::{ConfigError, Harvester};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::MockServer;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_config_file() {
    let file = write_config(
        r##"
[crawler]
min-chapters = 3
sync-max-pages = 30

[content]
max-pages-per-chapter = 4

[[site]]
name = "测试书屋"
host-contains = ["127.0.0.1"]
content-selectors = ["#txt"]
"##,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.crawler.min_chapters, 3);
    assert_eq!(config.crawler.sync_max_pages, 30);
    assert_eq!(config.crawler.import_max_pages, 8);
    assert_eq!(config.content.max_pages_per_chapter, 4);
    assert_eq!(config.sites.len(), 1);
    assert_eq!(config.sync.max_concurrent_refreshes, 3);
}

#[test]
fn test_invalid_config_file() {
    let file = write_config("[crawler]\nmin-chapters = 0\n");
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::Validation(_))
    ));

    let file = write_config("[crawler\n");
    assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));

    let file = write_config("[content]\nnoise-patterns = [\"(unclosed\"]\n");
    assert!(matches!(
        load_config(file.path()),
        Err(ConfigError::InvalidPattern(_))
    ));
}

#[tokio::test]
async fn test_configured_site_selectors_used() {
    let file = write_config(
        r##"
[fetcher]
try-host-variants = false

[[site]]
name = "测试书屋"
host-contains = ["127.0.0.1"]
content-selectors = ["#txt"]
"##,
    );
    let config = load_config(file.path()).unwrap();
    let h = Harvester::new(config).unwrap();

    let server = MockServer::start().await;
    mount_page(
        &server,
        "/book/12345/1.html",
        "<html><body><div id=\"content\">本站推荐阅读更多精彩小说请访问首页</div><div id=\"txt\">真正的正文</div></body></html>"
            .to_string(),
        1,
    )
    .await;

    let book = known_book(&server, 1..=1);
    let content = h.load_book_content(&book, 0).await;
    assert_eq!(content.text, "真正的正文");
    assert_eq!(h.sites().source_label("127.0.0.1"), "测试书屋");
}
