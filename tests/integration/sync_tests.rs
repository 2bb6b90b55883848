//! Incremental sync scenarios

use crate::common::*;
use novel_harvest::{Harvester, SyncRegistry};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mounts a two-page catalog whose second page ends at `last`
async fn mount_catalog(server: &MockServer, last: usize) {
    mount_page(
        server,
        CATALOG_PATH,
        catalog_html("长夜行", 1..=50, Some("index_2.html")),
        1,
    )
    .await;
    mount_page(
        server,
        "/book/12345/index_2.html",
        catalog_html("长夜行", 51..=last, None),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/book/12345/index_3.html"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sync_without_new_chapters() {
    let server = MockServer::start().await;
    mount_catalog(&server, 100).await;

    let h = harvester();
    let book = known_book(&server, 1..=100);
    let max_pages = h.config().crawler.sync_max_pages;
    let synced = h.sync_incremental(&book, max_pages, None, None).await.unwrap();

    assert_eq!(synced, book);
}

#[tokio::test]
async fn test_sync_appends_three_chapters() {
    let server = MockServer::start().await;
    mount_catalog(&server, 103).await;

    let h = harvester();
    let book = known_book(&server, 1..=100);
    let max_pages = h.config().crawler.sync_max_pages;
    let synced = h.sync_incremental(&book, max_pages, None, None).await.unwrap();

    assert_eq!(synced.chapters.len(), 103);
    assert_eq!(&synced.chapters[..100], &book.chapters[..]);
    let appended: Vec<&str> = synced.chapters[100..].iter().map(|c| c.title.as_str()).collect();
    assert_eq!(appended, vec!["第101章 标题101", "第102章 标题102", "第103章 标题103"]);
}

#[tokio::test]
async fn test_sync_unreachable_catalog() {
    let server = MockServer::start().await;
    let h = harvester();
    let book = known_book(&server, 1..=10);
    assert!(h.sync_incremental(&book, 5, None, None).await.is_none());
    assert!(matches!(
        h.try_sync_incremental(&book, 5, None, None).await,
        Err(novel_harvest::HarvestError::CatalogUnavailable { .. })
    ));
}

#[tokio::test]
async fn test_background_sync_job() {
    let server = MockServer::start().await;
    mount_catalog(&server, 103).await;

    let registry = SyncRegistry::new(Arc::new(
        Harvester::new(test_config()).expect("Failed to build harvester"),
    ));
    let book = known_book(&server, 1..=100);

    let handle = registry.start_sync(book.clone()).expect("Job should start");
    assert!(registry.start_sync(book.clone()).is_none());

    let synced = handle.join.await.unwrap().expect("Sync should succeed");
    assert_eq!(synced.chapters.len(), 103);
    assert!(!registry.is_active(&book.id));
}
