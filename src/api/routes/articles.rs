//! Article lookup handlers.

use super::{ArticleQuery, preview_requested};
use crate::api::AppState;
use crate::content::load_article;
use crate::error::Error;
use crate::types::Article;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Slugs of all published articles
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ArticleList {
    /// Published slugs, newest first
    pub slugs: Vec<String>,
}

/// GET /api/articles - List published article slugs
#[utoipa::path(
    get,
    path = "/api/articles",
    tag = "articles",
    responses(
        (status = 200, description = "Published article slugs", body = ArticleList),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_articles(State(state): State<AppState>) -> Result<Json<ArticleList>, Error> {
    let slugs = state.source.list_slugs().await?;
    Ok(Json(ArticleList { slugs }))
}

/// GET /api/articles/:slug - Get a prepared article
///
/// Gated articles come back with their lead only.
#[utoipa::path(
    get,
    path = "/api/articles/{slug}",
    tag = "articles",
    params(
        ("slug" = String, Path, description = "Article slug"),
        ("preview" = Option<bool>, Query, description = "Include drafts, if preview is enabled")
    ),
    responses(
        (status = 200, description = "Article, with the body withheld when gated", body = Article),
        (status = 404, description = "No article with this slug", body = crate::error::ApiError),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_article(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<ArticleQuery>,
) -> Result<Response, Error> {
    let preview = preview_requested(&query, state.config.content.preview_enabled);

    let article = load_article(state.source.as_ref(), &slug, preview)
        .await?
        .ok_or(Error::ArticleMissing { slug })?;

    let cache_control = if preview {
        HeaderValue::from_static("no-store")
    } else {
        revalidate_header(state.config.site.revalidate.as_secs())
    };

    let mut response = Json(article).into_response();
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, cache_control);
    Ok(response)
}

/// Shared-cache policy for published content
pub(crate) fn revalidate_header(seconds: u64) -> HeaderValue {
    let value = format!("public, s-maxage={seconds}, stale-while-revalidate");
    HeaderValue::from_str(&value).unwrap_or(HeaderValue::from_static("no-store"))
}
