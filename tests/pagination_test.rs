use mockito::{Matcher, Server};
use pretty_assertions::assert_eq;

use ygodb::api::{CardCategory, WikiClient, WikiSource};
use ygodb::config::WikiConfig;
use ygodb::connectivity::StaticConnectivity;
use ygodb::error::YgoError;
use ygodb::index::CardIndex;
use ygodb::local::SqliteCardStore;

fn client(base_url: String) -> WikiClient {
    WikiClient::new(WikiConfig {
        base_url,
        page_size: 2,
        max_retries: 3,
        retry_base_delay: 1,
        timeout: 5,
        ..Default::default()
    })
    .unwrap()
}

fn first_page(category: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("category".to_string(), category.to_string()),
        Matcher::UrlEncoded("limit".to_string(), "2".to_string()),
        Matcher::Regex("namespaces=0$".to_string()),
    ])
}

fn continuation(category: &str, offset: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("category".to_string(), category.to_string()),
        Matcher::UrlEncoded("offset".to_string(), offset.to_string()),
    ])
}

#[tokio::test]
async fn test_list_page_follows_offset() {
    let mut server = Server::new_async().await;
    let first = server
        .mock("GET", "/api/v1/Articles/List")
        .match_query(first_page("TCG_cards"))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"items":[
                {"id":1,"title":"Dark Magician","url":"/wiki/Dark_Magician"},
                {"id":2,"title":"Kuriboh","url":"/wiki/Kuriboh"}
            ],"offset":"Kuriboh"}"#,
        )
        .expect(1)
        .create_async()
        .await;
    let second = server
        .mock("GET", "/api/v1/Articles/List")
        .match_query(continuation("TCG_cards", "Kuriboh"))
        .with_status(200)
        .with_body(r#"{"items":[{"id":"3","title":"Pot of Greed","url":"/wiki/Pot_of_Greed"}]}"#)
        .expect(1)
        .create_async()
        .await;

    let client = client(server.url());

    let page = client.fetch_article_list(CardCategory::Tcg, None).await.unwrap();
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.offset.as_deref(), Some("Kuriboh"));

    let page = client
        .fetch_article_list(CardCategory::Tcg, page.offset.as_deref())
        .await
        .unwrap();
    assert_eq!(page.items[0].title, "Pot of Greed");
    assert_eq!(page.offset, None);

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_index_walks_both_categories_and_dedups() {
    let mut server = Server::new_async().await;
    let _tcg_first = server
        .mock("GET", "/api/v1/Articles/List")
        .match_query(first_page("TCG_cards"))
        .with_body(
            r#"{"items":[
                {"id":1,"title":"Dark Magician","url":"/wiki/Dark_Magician"},
                {"id":2,"title":"Kuriboh","url":"/wiki/Kuriboh"}
            ],"offset":"Kuriboh"}"#,
        )
        .create_async()
        .await;
    let _tcg_second = server
        .mock("GET", "/api/v1/Articles/List")
        .match_query(continuation("TCG_cards", "Kuriboh"))
        .with_body(r#"{"items":[{"id":3,"title":"Pot of Greed","url":"/wiki/Pot_of_Greed"}]}"#)
        .create_async()
        .await;
    let _ocg = server
        .mock("GET", "/api/v1/Articles/List")
        .match_query(first_page("OCG_cards"))
        .with_body(
            r#"{"items":[
                {"id":99,"title":"Kuriboh","url":"/wiki/Kuriboh_(OCG)"},
                {"id":4,"title":"Ash Blossom & Joyous Spring","url":"/wiki/Ash_Blossom_%26_Joyous_Spring"}
            ],"offset":null}"#,
        )
        .create_async()
        .await;

    let wiki = client(server.url());
    let store = SqliteCardStore::new("/nonexistent/cards.db");
    let index = CardIndex::new();

    index
        .ensure_indexed(&StaticConnectivity::online(), &wiki, &store)
        .await
        .unwrap();

    assert_eq!(
        index.card_names().await,
        vec![
            "Dark Magician".to_string(),
            "Kuriboh".to_string(),
            "Pot of Greed".to_string(),
            "Ash Blossom & Joyous Spring".to_string(),
        ]
    );
    let kuriboh = index.entry("Kuriboh").await.unwrap();
    assert_eq!(kuriboh.path, "/wiki/Kuriboh");
    assert_eq!(kuriboh.id, 2);
}

#[tokio::test]
async fn test_server_errors_are_retried_then_reported() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/wiki/Dark_Magician")
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let result = client(server.url()).fetch_page("/wiki/Dark_Magician").await;
    assert!(matches!(result, Err(YgoError::ServerError(_))));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_rate_limit_is_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/wiki/Dark_Magician")
        .with_status(429)
        .expect(3)
        .create_async()
        .await;

    let result = client(server.url()).fetch_page("/wiki/Dark_Magician").await;
    assert!(matches!(result, Err(YgoError::RateLimit)));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_client_errors_are_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/wiki/Card_Tips:Dark_Magician")
        .with_status(404)
        .expect(1)
        .create_async()
        .await;

    let result = client(server.url()).fetch_page("/wiki/Card_Tips:Dark_Magician").await;
    assert!(matches!(result, Err(YgoError::HttpStatus { status: 404, .. })));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_malformed_list_is_a_parse_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v1/Articles/List")
        .match_query(Matcher::Any)
        .with_body("<html>maintenance</html>")
        .create_async()
        .await;

    let result = client(server.url()).fetch_article_list(CardCategory::Ocg, None).await;
    assert!(matches!(result, Err(YgoError::Parse(_))));
}
