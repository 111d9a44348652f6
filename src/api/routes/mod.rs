//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`unlock`] - The gated-content unlock endpoint
//! - [`articles`] - Article lookup and static path enumeration
//! - [`pages`] - Server-rendered article pages
//! - [`system`] - Health and OpenAPI

use axum::http::{HeaderMap, header};
use serde::{Deserialize, Serialize};

mod articles;
mod pages;
mod system;
mod unlock;

pub use articles::*;
pub use pages::*;
pub use system::*;
pub use unlock::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Query parameters for article lookups
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ArticleQuery {
    /// Serve drafts, if preview is enabled in the config (default: false)
    pub preview: Option<bool>,
}

/// Client identity of a request: its User-Agent, or empty when absent
pub fn client_identity(headers: &HeaderMap) -> &str {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

/// Whether a request may see drafts
pub(crate) fn preview_requested(query: &ArticleQuery, preview_enabled: bool) -> bool {
    preview_enabled && query.preview.unwrap_or(false)
}
