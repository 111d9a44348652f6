//! Server side of the unlock endpoint
//!
//! [`AccessService`] checks an unlock request against the configured
//! [`AccessPolicy`] and returns the full body of the article. It also
//! implements [`UnlockClient`], so a server-rendered page can run the resolver
//! in-process without an HTTP round-trip.

use crate::config::AccessPolicy;
use crate::content::ArticleSource;
use crate::error::{Error, Result};
use crate::gate::{CrawlerDetector, UnlockClient};
use crate::types::{RichTextViewModel, UnlockRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Grants or denies access to gated article bodies
#[derive(Clone)]
pub struct AccessService {
    source: Arc<dyn ArticleSource>,
    policy: AccessPolicy,
    crawler: CrawlerDetector,
    preview: bool,
}

impl AccessService {
    /// Create a service over `source`
    pub fn new(source: Arc<dyn ArticleSource>, policy: AccessPolicy, crawler: CrawlerDetector) -> Self {
        Self {
            source,
            policy,
            crawler,
            preview: false,
        }
    }

    /// Also look up drafts when resolving unlock requests
    ///
    /// Used for in-process preview pages; the HTTP endpoint only serves
    /// published articles.
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Whether a request with `access_control` from `client_identity` may see gated content
    ///
    /// Requests without a token are only let through for indexing agents.
    pub fn grants(&self, access_control: Option<&str>, client_identity: &str) -> bool {
        match access_control.map(str::trim) {
            Some(token) if !token.is_empty() => match &self.policy {
                AccessPolicy::AnyNonEmpty => true,
                AccessPolicy::Tokens(tokens) => tokens.iter().any(|t| t == token),
            },
            _ => self.crawler.is_indexing_agent(client_identity),
        }
    }

    /// Resolve an unlock request into the article's full body
    ///
    /// Free articles are returned without checking the token. `Ok(None)` means
    /// the article exists but has no body.
    pub async fn unlock_body(
        &self,
        request: &UnlockRequest,
        client_identity: &str,
    ) -> Result<Option<RichTextViewModel>> {
        let slug = request.slug.trim();
        if slug.is_empty() {
            return Err(Error::InvalidRequest("slug must not be empty".to_string()));
        }

        let item = self
            .source
            .get_item(slug, self.preview)
            .await?
            .ok_or_else(|| Error::ArticleMissing {
                slug: slug.to_string(),
            })?;

        if !item.is_gated {
            return Ok(item.body);
        }

        if !self.grants(request.access_control.as_deref(), client_identity) {
            tracing::info!(slug = %slug, "unlock denied");
            return Err(Error::AccessDenied(
                "access token not accepted".to_string(),
            ));
        }

        tracing::info!(
            slug = %slug,
            with_token = request.access_control.is_some(),
            "unlock granted"
        );
        Ok(item.body)
    }
}

#[async_trait]
impl UnlockClient for AccessService {
    async fn unlock(
        &self,
        request: &UnlockRequest,
        client_identity: &str,
    ) -> Result<Option<RichTextViewModel>> {
        self.unlock_body(request, client_identity).await
    }

    fn name(&self) -> &'static str {
        "in-process"
    }
}
