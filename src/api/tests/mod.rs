use super::*;
use crate::Config;
use crate::config::AccessPolicy;
use crate::content::InMemoryArticleSource;
use crate::types::{ArticleId, ContentItem, RichTextViewModel, Seo};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

mod unlock;

const GOOGLEBOT: &str = "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";
const BROWSER: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

fn content_item(slug: &str, is_gated: bool, date: &str) -> ContentItem {
    ContentItem {
        id: ArticleId::new(format!("id-{slug}")),
        slug: slug.to_string(),
        title: format!("Title of {slug}"),
        date: Some(date.parse().unwrap()),
        image: None,
        seo: Seo {
            title: format!("SEO {slug}"),
            description: "Post description".to_string(),
            canonical_url: format!("/articles/{slug}"),
            ..Default::default()
        },
        is_gated,
        lead_content: Some(RichTextViewModel::from_html("<p>Teaser text</p>")),
        body: Some(RichTextViewModel::from_html("<p>The whole story</p>")),
        draft: false,
    }
}

/// Site with a gated article, a free article and a draft
fn test_state_with(config: Config) -> AppState {
    let mut draft = content_item("draft-post", false, "2024-05-01T00:00:00Z");
    draft.draft = true;

    let source = InMemoryArticleSource::new([
        content_item("hello-world", true, "2024-03-01T09:00:00Z"),
        content_item("free-post", false, "2024-02-01T09:00:00Z"),
        draft,
    ]);

    AppState::new(Arc::new(config), Arc::new(source))
}

fn test_state() -> AppState {
    test_state_with(Config::default())
}

fn test_app() -> Router {
    create_router(test_state())
}

async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}

fn header<'a>(response: &'a Response<Body>, name: &str) -> &'a str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_health_endpoint() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_openapi_endpoint() {
    let request = Request::builder()
        .uri("/openapi.json")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["paths"]["/api/gated-content"]["post"].is_object());
}

#[tokio::test]
async fn test_cors_enabled() {
    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers().contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let mut config = Config::default();
    config.server.api.cors_enabled = false;
    let app = create_router(test_state_with(config));

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(!response.headers().contains_key("access-control-allow-origin"));
}

#[tokio::test]
async fn test_swagger_ui_toggle() {
    let request = || {
        Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap()
    };

    let response = test_app().oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let mut config = Config::default();
    config.server.api.swagger_ui = false;
    let app = create_router(test_state_with(config));
    let response = app.oneshot(request()).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_state_from_config_without_content_is_empty() {
    let state = AppState::from_config(Arc::new(Config::default()))
        .await
        .unwrap();
    assert!(state.source.list_slugs().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_state_from_config_rejects_bad_endpoint() {
    let mut config = Config::default();
    config.gate.unlock_endpoint = "not a url".to_string();

    let result = AppState::from_config(Arc::new(config)).await;
    assert!(matches!(result, Err(crate::Error::Config { .. })));
}

#[tokio::test]
async fn test_server_shuts_down_gracefully() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let handle = tokio::spawn(serve_on(listener, test_state(), async move {
        let _ = rx.await;
    }));

    tx.send(()).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("server should stop after the shutdown signal")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_token_list_policy_applies_to_router() {
    let mut config = Config::default();
    config.gate.access_policy = AccessPolicy::Tokens(vec!["Pineapple".to_string()]);
    let app = create_router(test_state_with(config));

    let request = Request::builder()
        .method("POST")
        .uri("/api/gated-content")
        .header("content-type", "application/json")
        .header("user-agent", BROWSER)
        .body(Body::from(r#"{"slug":"hello-world","accessControl":"Banana"}"#))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
