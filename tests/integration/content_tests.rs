//! Chapter content scenarios

use crate::common::*;
use novel_harvest::Chapter;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_gb18030_fallback() {
    let server = MockServer::start().await;
    let html = chapter_html("夜色渐深，长街上只剩下一盏孤灯。<br>他推开门，走进了风雪里。", None);
    let (encoded, _, _) = encoding_rs::GB18030.encode(&html);
    Mock::given(method("GET"))
        .and(path("/book/12345/1.html"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(encoded.into_owned(), "text/html"))
        .mount(&server)
        .await;

    let book = known_book(&server, 1..=1);
    let content = harvester().load_book_content(&book, 0).await;

    assert!(!content.is_fallback);
    assert_eq!(
        content.text,
        "夜色渐深，长街上只剩下一盏孤灯。\n他推开门，走进了风雪里。"
    );
    assert_eq!(content.paragraphs.len(), 2);
}

#[tokio::test]
async fn test_chapter_pagination_loop_guard() {
    let server = MockServer::start().await;
    mount_page(&server, "/book/12345/1.html", chapter_html("第一页正文", Some("1_2.html")), 1).await;
    mount_page(&server, "/book/12345/1_2.html", chapter_html("第二页正文", Some("1.html")), 1).await;

    let book = known_book(&server, 1..=1);
    let text = harvester()
        .load_chapter(&book, &book.chapters[0].url, None)
        .await;

    assert_eq!(text, "第一页正文\n\n第二页正文");
}

#[tokio::test]
async fn test_next_chapter_is_not_a_page() {
    let server = MockServer::start().await;
    mount_page(&server, "/book/12345/1.html", chapter_html("正文", Some("2.html")), 1).await;
    mount_page(&server, "/book/12345/2.html", chapter_html("下一章", None), 0).await;

    let book = known_book(&server, 1..=2);
    let content = harvester().load_book_content(&book, 0).await;
    assert_eq!(content.text, "正文");
}

#[tokio::test]
async fn test_fallback_never_blank() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut book = known_book(&server, 1..=3);
    book.description = Some("一段简介".to_string());
    let h = harvester();

    let content = h.load_book_content(&book, 1).await;
    assert!(content.is_fallback);
    assert!(content.text.contains("长夜行"));
    assert!(content.text.contains("一段简介"));
    assert!(!content.paragraphs.is_empty());

    book.chapters = vec![Chapter::new("第1章", "")];
    let content = h.load_book_content(&book, 0).await;
    assert!(content.is_fallback);
}
