use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, Redirect};
use axum::routing::get;
use axum::Router;
use wq_core::{ArticleText, Error, FetchError};
use wq_inference::Synthesizer;
use wq_scrappers::{ExtractorConfig, QuizPipeline, WikipediaScraper};
use wq_storage::InMemoryStorage;

const EXAMPLE: &str = r##"<!DOCTYPE html>
<html>
  <head><title>Example - Wikipedia</title></head>
  <body>
    <h1 id="firstHeading">Example</h1>
    <div id="mw-content-text">
      <div class="mw-parser-output">
        <p>Paragraph one.</p>
        <p>Paragraph two.<sup class="reference"><a href="#cite_note-1">[1]</a></sup></p>
      </div>
    </div>
  </body>
</html>"##;

async fn echo_headers(headers: HeaderMap) -> Html<String> {
    let value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string()
    };
    Html(format!(
        r#"<h1 id="firstHeading">Headers</h1><div id="mw-content-text"><p>{}</p><p>{}</p><p>{}</p></div>"#,
        value(header::USER_AGENT),
        value(header::ACCEPT_LANGUAGE),
        value(header::REFERER)
    ))
}

async fn spawn_site() -> SocketAddr {
    let app = Router::new()
        .route("/wiki/Example", get(|| async { Html(EXAMPLE) }))
        .route("/wiki/Redirected", get(|| async { Redirect::temporary("/wiki/Example") }))
        .route("/wiki/Blocked", get(|| async { (StatusCode::FORBIDDEN, "Please set a user-agent") }))
        .route("/wiki/Broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "oops") }))
        .route("/wiki/Empty", get(|| async { Html("<html><head><title>Empty</title></head><body></body></html>") }))
        .route(
            "/wiki/Slow",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Html(EXAMPLE)
            }),
        )
        .route("/wiki/Headers", get(echo_headers));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn url(addr: SocketAddr, page: &str) -> String {
    format!("http://{}/wiki/{}", addr, page)
}

#[tokio::test]
async fn extracts_title_and_body_without_footnotes() {
    let addr = spawn_site().await;
    let scraper = WikipediaScraper::new().unwrap();

    let article = scraper.extract(&url(addr, "Example")).await.unwrap();
    assert_eq!(
        article,
        ArticleText {
            title: "Example".to_string(),
            body: "Paragraph one.\n\nParagraph two.".to_string(),
        }
    );
}

#[tokio::test]
async fn follows_redirects() {
    let addr = spawn_site().await;
    let scraper = WikipediaScraper::new().unwrap();
    let article = scraper.extract(&url(addr, "Redirected")).await.unwrap();
    assert_eq!(article.title, "Example");
}

#[tokio::test]
async fn sends_browser_headers() {
    let addr = spawn_site().await;
    let config = ExtractorConfig::default();
    let scraper = WikipediaScraper::with_config(&config).unwrap();

    let article = scraper.extract(&url(addr, "Headers")).await.unwrap();
    let paragraphs: Vec<&str> = article.paragraphs().collect();
    assert_eq!(paragraphs, vec![config.user_agent.as_str(), "en-US,en;q=0.9", "https://www.google.com/"]);
}

#[tokio::test]
async fn blocked_status_is_distinguished_from_other_failures() {
    let addr = spawn_site().await;
    let scraper = WikipediaScraper::new().unwrap();

    match scraper.extract(&url(addr, "Blocked")).await {
        Err(Error::Fetch(e)) => {
            assert!(e.is_blocked());
            assert_eq!(e.status(), Some(403));
        }
        other => panic!("expected blocked fetch error, got {:?}", other),
    }

    match scraper.extract(&url(addr, "Broken")).await {
        Err(Error::Fetch(FetchError::Status { status, .. })) => assert_eq!(status, 500),
        other => panic!("expected status error, got {:?}", other),
    }

    match scraper.extract(&url(addr, "Nowhere")).await {
        Err(Error::Fetch(FetchError::Status { status, .. })) => assert_eq!(status, 404),
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn page_without_paragraphs_is_empty_content() {
    let addr = spawn_site().await;
    let scraper = WikipediaScraper::new().unwrap();
    let err = scraper.extract(&url(addr, "Empty")).await.unwrap_err();
    assert!(matches!(err, Error::EmptyContent { .. }));
}

#[tokio::test]
async fn fetch_times_out() {
    let addr = spawn_site().await;
    let config = ExtractorConfig::default().with_timeout(Duration::from_millis(200));
    let scraper = WikipediaScraper::with_config(&config).unwrap();

    let err = scraper.extract(&url(addr, "Slow")).await.unwrap_err();
    assert!(matches!(err, Error::Fetch(FetchError::Transport(ref e)) if e.is_timeout()));
}

#[tokio::test]
async fn url_to_stored_placeholder_quiz() {
    let addr = spawn_site().await;
    let pipeline = QuizPipeline::new(
        Arc::new(WikipediaScraper::new().unwrap()),
        Arc::new(Synthesizer::offline()),
        Arc::new(InMemoryStorage::new()),
    );

    let page = url(addr, "Example");
    let stored = pipeline.generate(&page).await.unwrap();
    let record = &stored.record;

    assert_eq!(record.url, page);
    assert_eq!(record.title, "Example");
    assert_eq!(record.full_text, "Paragraph one.\n\nParagraph two.");
    assert_eq!(record.quiz.len(), 8);
    for question in &record.quiz {
        assert!(question.options.contains(&question.answer));
        assert!((3..=5).contains(&question.options.len()));
    }

    let history = pipeline.storage().list().await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, stored.id);
}
