//! Server-rendered article pages.
//!
//! Each request drives its own [`GatedContentResolver`] in-process: resolve
//! the route, mount for the requesting client, optionally submit the gate
//! form, then render whatever view the resolver settled on.

use super::articles::revalidate_header;
use super::{ArticleQuery, client_identity, preview_requested};
use crate::api::AppState;
use crate::content::load_article;
use crate::error::Error;
use crate::gate::{GateView, GatedContentResolver, SubmitOutcome, ViewKind};
use crate::render::{escape_html, render_document, render_preview_document};
use axum::{
    Form,
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

/// Fields of the gate form
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GateForm {
    /// Access token typed by the reader
    #[serde(default)]
    pub access_control: String,
}

/// GET /articles/:slug - Render an article page
///
/// Indexing agents get the full body of gated articles; everyone else gets
/// the lead and the gate form.
#[utoipa::path(
    get,
    path = "/articles/{slug}",
    tag = "pages",
    params(
        ("slug" = String, Path, description = "Article slug"),
        ("preview" = Option<bool>, Query, description = "Include drafts, if preview is enabled")
    ),
    responses(
        (status = 200, description = "Rendered article", content_type = "text/html"),
        (status = 404, description = "No article with this slug", content_type = "text/html"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn render_article_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ArticleQuery>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let preview = preview_requested(&query, state.config.content.preview_enabled);
    let resolver = mounted_resolver(&state, &slug, preview, client_identity(&headers)).await?;

    let view = resolver.view();
    resolver.unmount();

    Ok(page_response(&state, &view, preview, preview, StatusCode::OK))
}

/// POST /articles/:slug - Submit the gate form
#[utoipa::path(
    post,
    path = "/articles/{slug}",
    tag = "pages",
    params(
        ("slug" = String, Path, description = "Article slug"),
        ("preview" = Option<bool>, Query, description = "Include drafts, if preview is enabled")
    ),
    request_body(content = GateForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Rendered article, unlocked if the token was accepted", content_type = "text/html"),
        (status = 401, description = "Token rejected, the gate is shown again", content_type = "text/html"),
        (status = 404, description = "No article with this slug", content_type = "text/html")
    )
)]
pub async fn submit_article_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ArticleQuery>,
    headers: HeaderMap,
    Form(form): Form<GateForm>,
) -> Result<Response, Error> {
    let preview = preview_requested(&query, state.config.content.preview_enabled);
    let resolver = mounted_resolver(&state, &slug, preview, client_identity(&headers)).await?;

    let status = match resolver.submit(&form.access_control).await {
        SubmitOutcome::StillGated => StatusCode::UNAUTHORIZED,
        outcome => {
            tracing::debug!(slug = %slug, ?outcome, "gate form handled");
            StatusCode::OK
        }
    };

    let view = resolver.view();
    resolver.unmount();

    Ok(page_response(&state, &view, preview, true, status))
}

async fn mounted_resolver(
    state: &AppState,
    slug: &str,
    preview: bool,
    identity: &str,
) -> Result<GatedContentResolver, Error> {
    let article = load_article(state.source.as_ref(), slug, preview).await?;

    let resolver = if preview {
        let access = state.access.as_ref().clone().with_preview(true);
        GatedContentResolver::pending(Arc::new(access), state.crawler.clone())
    } else {
        GatedContentResolver::pending(state.access.clone(), state.crawler.clone())
    };
    resolver.resolve(slug, article);
    resolver.mount(identity).await;

    Ok(resolver)
}

fn page_response(
    state: &AppState,
    view: &GateView,
    preview: bool,
    private: bool,
    status: StatusCode,
) -> Response {
    let site = &state.config.site;
    let status = if view.kind() == ViewKind::Missing {
        StatusCode::NOT_FOUND
    } else {
        status
    };

    let title = view
        .article()
        .map(|a| a.seo.title.as_str())
        .ok()
        .filter(|t| !t.is_empty())
        .unwrap_or(site.author.as_str());
    let description = view
        .article()
        .map(|a| a.seo.description.as_str())
        .unwrap_or_default();

    let page = format!(
        concat!(
            "<!DOCTYPE html><html><head><meta charset=\"utf-8\">",
            "<title>{title}</title>",
            "<meta name=\"description\" content=\"{description}\">",
            "</head><body>{content}</body></html>"
        ),
        title = escape_html(title),
        description = escape_html(description),
        content = if preview {
            render_preview_document(view, site)
        } else {
            render_document(view, site)
        },
    );

    // Only pages every reader sees identically may sit in a shared cache
    let shared = !private && matches!(view.kind(), ViewKind::Free | ViewKind::LeadOnly);
    let cache_control = if shared {
        revalidate_header(site.revalidate.as_secs())
    } else {
        HeaderValue::from_static("private, no-store")
    };

    let mut response = (status, Html(page)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(header::VARY, HeaderValue::from_static("user-agent"));
    response
}
