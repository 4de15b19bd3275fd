use std::fs;
use std::time::Duration;

use palimpseste::bot::{BotError, Runner};
use palimpseste::fetcher::WikiClient;
use palimpseste::publisher::{HttpPublisher, POST_BUDGET, PostFormat, PublishError, Publisher};
use palimpseste::sources::{SourceSite, SourceTable};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path, query_param},
};

const API_PATH: &str = "/w/api.php";
const PUBLISH_PATH: &str = "/2/tweets";
const TOKEN: &str = "test-token";

fn runner(server: &MockServer, attempts: u32) -> Runner<WikiClient> {
    let sites = SourceTable::new(vec![SourceSite::new("fr", &server.uri(), &["lac"], 1)]).unwrap();
    Runner::new(WikiClient::new(Duration::from_secs(5)).unwrap(), sites, attempts)
}

fn publisher(server: &MockServer) -> HttpPublisher {
    HttpPublisher::new(
        &format!("{}{}", server.uri(), PUBLISH_PATH),
        Some(TOKEN),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn post_format() -> PostFormat {
    PostFormat::new("https://palimpseste.vercel.app", "#littérature #palimpseste")
}

/// Listing answers both random and search requests with the same titles.
async fn mount_listing(server: &MockServer, titles: &[&str]) {
    let entries: Vec<Value> = titles.iter().map(|t| json!({"ns": 0, "title": t})).collect();
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"random": entries, "search": entries}
        })))
        .mount(server)
        .await;
}

async fn mount_poem(server: &MockServer) {
    let html = fs::read_to_string("src/extractor/tests/fixtures/poem.html").unwrap();
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Le Lac"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {
                "title": "Le Lac",
                "displaytitle": "Le Lac",
                "text": {"*": html},
                "links": [
                    {"ns": 102, "exists": "", "*": "Auteur:Alphonse de Lamartine"},
                    {"ns": 0, "exists": "", "*": "Méditations poétiques"}
                ]
            }
        })))
        .mount(server)
        .await;
}

async fn mount_missing(server: &MockServer, title: &str) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("action", "parse"))
        .and(query_param("page", title))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": {"code": "missingtitle", "info": "The page you specified doesn't exist."}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_run_publishes_one_post() {
    let server = MockServer::start().await;
    mount_listing(&server, &["Catégorie:Poèmes", "Page introuvable", "Le Lac"]).await;
    mount_missing(&server, "Page introuvable").await;
    mount_poem(&server).await;
    Mock::given(method("POST"))
        .and(path(PUBLISH_PATH))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "1789", "text": "..."}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut rng = StdRng::seed_from_u64(2024);
    let published = runner(&server, 3)
        .run(&publisher(&server), &post_format(), &mut rng)
        .await
        .unwrap();

    assert_eq!(published.receipt.id, "1789");
    assert_eq!(
        published.receipt.url.as_deref(),
        Some("https://x.com/i/status/1789")
    );
    assert_eq!(published.excerpt.title, "Le Lac");
    assert_eq!(
        published.excerpt.author.as_deref(),
        Some("Alphonse de Lamartine")
    );

    let requests = server.received_requests().await.unwrap();
    let sent = requests
        .iter()
        .find(|r| r.url.path() == PUBLISH_PATH)
        .unwrap();
    let body: Value = serde_json::from_slice(&sent.body).unwrap();
    let text = body["text"].as_str().unwrap();
    assert_eq!(text, published.post);
    assert!(text.chars().count() <= POST_BUDGET);
    assert!(text.contains(
        "\n\n— Alphonse de Lamartine\nhttps://palimpseste.vercel.app/#/author/Alphonse%20de%20Lamartine\n"
    ));

    let parsed: Vec<_> = requests
        .iter()
        .filter(|r| r.url.query_pairs().any(|(k, v)| k == "action" && v == "parse"))
        .collect();
    assert!(
        parsed
            .iter()
            .all(|r| !r.url.query_pairs().any(|(_, v)| v.starts_with("Catégorie")))
    );
}

#[tokio::test]
async fn test_exhaustion_publishes_nothing() {
    let server = MockServer::start().await;
    mount_listing(&server, &["Page introuvable"]).await;
    mount_missing(&server, "Page introuvable").await;
    Mock::given(method("POST"))
        .and(path(PUBLISH_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut rng = StdRng::seed_from_u64(1);
    let err = runner(&server, 2)
        .run(&publisher(&server), &post_format(), &mut rng)
        .await
        .unwrap_err();

    assert!(matches!(err, BotError::Exhausted { attempts: 2 }));
}

#[tokio::test]
async fn test_publish_rejection_carries_status_and_body() {
    let server = MockServer::start().await;
    mount_listing(&server, &["Le Lac"]).await;
    mount_poem(&server).await;
    Mock::given(method("POST"))
        .and(path(PUBLISH_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "title": "Forbidden",
            "detail": "You are not permitted to perform this action."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut rng = StdRng::seed_from_u64(3);
    let err = runner(&server, 1)
        .run(&publisher(&server), &post_format(), &mut rng)
        .await
        .unwrap_err();

    match err {
        BotError::Publish(PublishError::Rejected { status, body }) => {
            assert_eq!(status.as_u16(), 403);
            assert!(body.contains("Forbidden"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_created_without_id_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUBLISH_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_string("{}"))
        .mount(&server)
        .await;

    let err = publisher(&server).publish("Un vers.").await.unwrap_err();
    assert!(matches!(err, PublishError::Decode(_)));
}

#[tokio::test]
async fn test_ok_status_other_than_created_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(PUBLISH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "1"}})))
        .mount(&server)
        .await;

    let err = publisher(&server).publish("Un vers.").await.unwrap_err();
    assert!(matches!(err, PublishError::Rejected { .. }));
}

#[tokio::test]
async fn test_single_title_mode() {
    let server = MockServer::start().await;
    mount_poem(&server).await;

    let mut rng = StdRng::seed_from_u64(4);
    let excerpt = runner(&server, 1)
        .run_title("fr", "Le Lac", &mut rng)
        .await
        .unwrap();

    assert_eq!(excerpt.lang, "fr");
    assert_eq!(
        excerpt.source_url.as_str(),
        format!("{}/wiki/Le_Lac", server.uri())
    );
}
