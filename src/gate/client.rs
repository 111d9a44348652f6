//! Unlock fetch transport

use crate::config::GateConfig;
use crate::error::{Error, Result, UnlockError};
use crate::types::{RichTextViewModel, UnlockErrorBody, UnlockRequest, UnlockResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Exchanges a slug (and optional access token) for an article's full body
///
/// `Ok(None)` means the endpoint explicitly had no content to reveal.
/// Implementations must not retry; the resolver decides what a failure means.
#[async_trait]
pub trait UnlockClient: Send + Sync {
    /// Perform one unlock fetch on behalf of `client_identity`
    async fn unlock(
        &self,
        request: &UnlockRequest,
        client_identity: &str,
    ) -> Result<Option<RichTextViewModel>>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Unlock client that posts JSON to the unlock endpoint over HTTP
#[derive(Clone, Debug)]
pub struct HttpUnlockClient {
    client: reqwest::Client,
    endpoint: url::Url,
}

impl HttpUnlockClient {
    /// Create a client for `endpoint`
    ///
    /// `timeout` of `None` leaves the transport's default behaviour in place.
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let endpoint = url::Url::parse(endpoint).map_err(|e| Error::Config {
            message: format!("invalid unlock endpoint '{}': {}", endpoint, e),
            key: Some("gate.unlock_endpoint".to_string()),
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| Error::Config {
            message: format!("failed to create HTTP client: {}", e),
            key: None,
        })?;

        Ok(Self { client, endpoint })
    }

    /// Create a client from the gate configuration
    pub fn from_config(config: &GateConfig) -> Result<Self> {
        Self::new(&config.unlock_endpoint, config.request_timeout)
    }

    /// The endpoint requests are posted to
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

#[async_trait]
impl UnlockClient for HttpUnlockClient {
    async fn unlock(
        &self,
        request: &UnlockRequest,
        client_identity: &str,
    ) -> Result<Option<RichTextViewModel>> {
        let mut builder = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(request);

        if !client_identity.is_empty() {
            builder = builder.header(reqwest::header::USER_AGENT, client_identity);
        }

        let response = builder.send().await.map_err(UnlockError::Transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(UnlockError::Transport)?;

        if status.is_success() {
            let parsed: UnlockResponse = serde_json::from_slice(&bytes)
                .map_err(|e| UnlockError::MalformedPayload(e.to_string()))?;
            return Ok(parsed.body);
        }

        // Error payloads are `{ message }`; fall back to the raw body for anything else
        let (message, code) = match serde_json::from_slice::<UnlockErrorBody>(&bytes) {
            Ok(body) => (body.message, body.code),
            Err(_) => (String::from_utf8_lossy(&bytes).into_owned(), None),
        };

        Err(UnlockError::Status {
            status: status.as_u16(),
            message,
            code,
        }
        .into())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(token: Option<&str>) -> UnlockRequest {
        UnlockRequest {
            slug: "hello-world".into(),
            access_control: token.map(str::to_string),
        }
    }

    async fn client_for(server: &MockServer) -> HttpUnlockClient {
        HttpUnlockClient::new(&format!("{}/api/gated-content", server.uri()), None).unwrap()
    }

    #[tokio::test]
    async fn posts_slug_and_token_and_returns_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/gated-content"))
            .and(body_json(json!({ "slug": "hello-world", "accessControl": "Pineapple" })))
            .and(header("user-agent", "test-browser"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "body": { "html": "<p>Full</p>" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .await
            .unlock(&request(Some("Pineapple")), "test-browser")
            .await
            .unwrap();

        assert_eq!(body.unwrap().html, "<p>Full</p>");
    }

    #[tokio::test]
    async fn crawler_request_omits_access_control() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/gated-content"))
            .and(body_json(json!({ "slug": "hello-world" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "body": null })))
            .expect(1)
            .mount(&server)
            .await;

        let body = client_for(&server)
            .await
            .unlock(&request(None), "Googlebot/2.1")
            .await
            .unwrap();

        assert!(body.is_none());
    }

    #[tokio::test]
    async fn error_status_carries_message_and_code() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(
                json!({ "message": "access token not accepted", "code": "access_denied" }),
            ))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .unlock(&request(Some("wrong")), "")
            .await
            .unwrap_err();

        match err {
            Error::UnlockRequestFailed(UnlockError::Status {
                status,
                message,
                code,
            }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "access token not accepted");
                assert_eq!(code.as_deref(), Some("access_denied"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_is_kept_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .unlock(&request(Some("Pineapple")), "")
            .await
            .unwrap_err();

        match err {
            Error::UnlockRequestFailed(UnlockError::Status { status, message, .. }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Internal Server Error");
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_success_payload_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .await
            .unlock(&request(Some("Pineapple")), "")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::UnlockRequestFailed(UnlockError::MalformedPayload(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments
        let client = HttpUnlockClient::new(
            "http://127.0.0.1:9/api/gated-content",
            Some(Duration::from_secs(2)),
        )
        .unwrap();

        let err = client
            .unlock(&request(Some("Pineapple")), "")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::UnlockRequestFailed(UnlockError::Transport(_))
        ));
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let err = HttpUnlockClient::new("::not a url::", None).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn from_config_uses_gate_endpoint() {
        let config = GateConfig::default();
        let client = HttpUnlockClient::from_config(&config).unwrap();
        assert_eq!(client.endpoint().as_str(), config.unlock_endpoint);
    }
}
