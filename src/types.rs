//! Core types for gated-content

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::gate::ViewKind;

/// Opaque identifier of an article in the CMS
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ArticleId(pub String);

impl ArticleId {
    /// Create a new ArticleId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArticleId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for ArticleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Image referenced from a rich-text element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    /// CMS asset id
    pub image_id: String,
    /// Absolute asset URL
    pub url: String,
    /// Alt text
    #[serde(default)]
    pub description: Option<String>,
}

/// Link to another content item from a rich-text element
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkRef {
    /// Link id as it appears in the html
    pub link_id: String,
    /// Codename of the linked item
    pub codename: String,
    /// Content type of the linked item
    #[serde(rename = "type")]
    pub content_type: String,
    /// Url slug of the linked item
    pub url_slug: String,
}

/// Rich text as delivered by the CMS
///
/// Stored and passed through as-is; nothing in this crate interprets the html.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RichTextViewModel {
    /// Resolved html
    pub html: String,
    /// Images in document order
    #[serde(default)]
    pub images: Vec<ImageRef>,
    /// Links in document order
    #[serde(default)]
    pub links: Vec<LinkRef>,
    /// Linked content blocks (code blocks, tweets, ...) in document order
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub linked_items: Vec<serde_json::Value>,
}

impl RichTextViewModel {
    /// Rich text with only html and no images, links or linked items
    pub fn from_html(html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            ..Default::default()
        }
    }
}

/// SEO metadata carried alongside an article
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    /// Page title
    #[serde(default)]
    pub title: String,
    /// Meta description
    #[serde(default)]
    pub description: String,
    /// Meta keywords
    #[serde(default)]
    pub keywords: String,
    /// Open graph image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Open graph image alt text
    #[serde(default)]
    pub image_description: Option<String>,
    /// Canonical path, e.g. `/articles/hello-world`
    #[serde(default)]
    pub canonical_url: String,
}

/// Article as stored in the CMS, before the gating invariant is applied
///
/// Carries both the lead and the full body; see [`crate::content::prepare_article`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// CMS id
    pub id: ArticleId,
    /// Unique url slug
    pub slug: String,
    /// Title
    pub title: String,
    /// Publication date
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// Banner image URL
    #[serde(default)]
    pub image: Option<String>,
    /// SEO metadata
    #[serde(default)]
    pub seo: Seo,
    /// Whether the full body sits behind the access gate
    #[serde(default)]
    pub is_gated: bool,
    /// Excerpt shown before unlock
    #[serde(default)]
    pub lead_content: Option<RichTextViewModel>,
    /// Full content
    #[serde(default)]
    pub body: Option<RichTextViewModel>,
    /// Drafts are only served in preview mode
    #[serde(default)]
    pub draft: bool,
}

/// Article as handed to the resolver
///
/// When `is_gated` is true `lead_content` is set and `body` is withheld;
/// otherwise `body` is set and `lead_content` is absent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    /// CMS id
    pub id: ArticleId,
    /// Unique url slug, also the unlock fetch key
    pub slug: String,
    /// Title
    pub title: String,
    /// Publication date
    pub date: Option<DateTime<Utc>>,
    /// Banner image URL
    pub image: Option<String>,
    /// SEO metadata
    pub seo: Seo,
    /// Whether the full body sits behind the access gate
    pub is_gated: bool,
    /// Excerpt shown before unlock
    pub lead_content: Option<RichTextViewModel>,
    /// Full content, absent for gated articles until unlocked
    pub body: Option<RichTextViewModel>,
}

/// Body of an unlock request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnlockRequest {
    /// Slug of the gated article
    pub slug: String,
    /// User-supplied access token; absent for crawler unlocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_control: Option<String>,
}

/// Successful unlock response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnlockResponse {
    /// Full body, or null when the article has no content to reveal
    pub body: Option<RichTextViewModel>,
}

/// Error payload of the unlock endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnlockErrorBody {
    /// Human-readable reason
    pub message: String,
    /// Machine-readable error kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Event emitted by a [`crate::GatedContentResolver`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GateEvent {
    /// The rendered view changed
    ViewChanged {
        /// Article slug, when one is resolved
        #[serde(skip_serializing_if = "Option::is_none")]
        slug: Option<String>,
        /// Previous view
        from: ViewKind,
        /// New view
        to: ViewKind,
    },

    /// An unlock fetch failed and the view fell back to the lead
    UnlockFailed {
        /// Article slug
        slug: String,
        /// Diagnostic message
        error: String,
    },
}
