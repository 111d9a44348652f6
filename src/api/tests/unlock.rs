use super::*;

fn unlock_request(body: &str, user_agent: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/gated-content")
        .header("content-type", "application/json")
        .header("user-agent", user_agent)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_unlock_with_token_returns_body() {
    let request = unlock_request(r#"{"slug":"hello-world","accessControl":"Pineapple"}"#, BROWSER);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(header(&response, "cache-control"), "no-store");

    let json = body_json(response).await;
    assert_eq!(json["body"]["html"], "<p>The whole story</p>");
}

#[tokio::test]
async fn test_unlock_without_token_is_denied_for_browsers() {
    let request = unlock_request(r#"{"slug":"hello-world"}"#, BROWSER);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert!(json["message"].as_str().unwrap().contains("access"));
    assert_eq!(json["code"], "access_denied");
}

#[tokio::test]
async fn test_unlock_without_token_is_granted_for_crawlers() {
    let request = unlock_request(r#"{"slug":"hello-world"}"#, GOOGLEBOT);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["body"]["html"], "<p>The whole story</p>");
}

#[tokio::test]
async fn test_unlock_unknown_slug_is_404() {
    let request = unlock_request(r#"{"slug":"nope","accessControl":"x"}"#, BROWSER);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "article_missing");
}

#[tokio::test]
async fn test_unlock_draft_is_not_reachable() {
    let request = unlock_request(r#"{"slug":"draft-post","accessControl":"x"}"#, BROWSER);

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unlock_malformed_json_has_message() {
    let request = unlock_request("{not json", BROWSER);

    let response = test_app().oneshot(request).await.unwrap();

    assert!(response.status().is_client_error());
    let json = body_json(response).await;
    assert!(!json["message"].as_str().unwrap().is_empty());
    assert_eq!(json["code"], "invalid_request");
}

#[tokio::test]
async fn test_unlock_blank_slug_is_bad_request() {
    let request = unlock_request(r#"{"slug":"  ","accessControl":"x"}"#, BROWSER);

    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unlock_free_article_needs_no_token() {
    let request = unlock_request(r#"{"slug":"free-post"}"#, BROWSER);

    let response = test_app().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["body"]["html"], "<p>The whole story</p>");
}
