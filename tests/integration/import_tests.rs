//! Import and catalog crawl scenarios

use crate::common::*;
use novel_harvest::CrawlProgress;
use std::sync::Mutex;
use wiremock::MockServer;

#[tokio::test]
async fn test_import_clean_catalog() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        CATALOG_PATH,
        catalog_html("长夜行最新章节列表_长夜行全文阅读", 1..=10, None),
        1,
    )
    .await;

    let book = harvester()
        .import_from_url(&catalog_url(&server))
        .await
        .expect("Import should succeed");

    assert_eq!(book.title, "长夜行");
    assert_eq!(book.author, "青灯");
    assert_eq!(book.chapters.len(), 10);
    for (i, chapter) in book.chapters.iter().enumerate() {
        assert_eq!(chapter.title, chapter_title(i + 1));
    }
    assert_eq!(book.text_url.as_deref(), Some(book.chapters[0].url.as_str()));
    assert_eq!(book.catalog_url, Some(catalog_url(&server)));
}

#[tokio::test]
async fn test_paginated_catalog_crawl() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        CATALOG_PATH,
        catalog_html("长夜行", 1..=50, Some("index_2.html")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/book/12345/index_2.html",
        catalog_html("长夜行", 51..=100, None),
        1,
    )
    .await;

    let seen = Mutex::new(Vec::new());
    let record = |p: CrawlProgress| seen.lock().unwrap().push(p);
    let outcome = harvester()
        .crawl_catalog(&catalog_url(&server), 5, Some(&record), None)
        .await
        .unwrap();

    assert_eq!(outcome.chapters.len(), 100);
    assert_eq!(outcome.pages_fetched_ok, 2);
    assert_eq!(outcome.chapters[0].title, chapter_title(1));
    assert_eq!(outcome.chapters[99].title, chapter_title(100));

    let seen = seen.into_inner().unwrap();
    assert_eq!(seen.len(), outcome.pages_scanned);
    assert!(seen.windows(2).all(|w| w[0].scanned_pages < w[1].scanned_pages));
    assert_eq!(seen.last().map(|p| p.found_chapters), Some(100));
}

#[tokio::test]
async fn test_import_follows_thin_seed() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        CATALOG_PATH,
        catalog_html("长夜行", 1..=3, Some("index_2.html")),
        1,
    )
    .await;
    mount_page(
        &server,
        "/book/12345/index_2.html",
        catalog_html("长夜行", 4..=20, None),
        1,
    )
    .await;

    let book = harvester()
        .import_from_url(&catalog_url(&server))
        .await
        .unwrap();
    assert_eq!(book.chapters.len(), 20);
    assert_eq!(book.chapters[3].title, chapter_title(4));
}

#[tokio::test]
async fn test_import_rejects_thin_catalog() {
    let server = MockServer::start().await;
    mount_page(&server, CATALOG_PATH, catalog_html("短篇", 1..=4, None), 1).await;

    let book = harvester()
        .import_from_url(&catalog_url(&server))
        .await
        .unwrap();
    assert!(book.chapters.is_empty());
    assert_eq!(book.catalog_url, None);
    assert_eq!(book.text_url, Some(catalog_url(&server)));
}

#[tokio::test]
async fn test_import_unavailable_page() {
    let server = MockServer::start().await;
    let h = harvester();
    assert!(h.import_from_url(&catalog_url(&server)).await.is_none());
    assert!(h.import_from_url("not a url").await.is_none());
}
