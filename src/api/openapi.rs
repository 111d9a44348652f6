//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the gated-content REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the gated-content REST API
///
/// The spec can be accessed via:
/// - `/openapi.json` - JSON format OpenAPI specification
/// - `/swagger-ui` - Interactive Swagger UI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "gated-content REST API",
        version = "0.1.0",
        description = "Progressive disclosure of gated articles: lead excerpts, an unlock endpoint, and server-rendered pages",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Gate
        crate::api::routes::unlock_content,

        // Articles
        crate::api::routes::list_articles,
        crate::api::routes::get_article,

        // Pages
        crate::api::routes::render_article_page,
        crate::api::routes::submit_article_page,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Content types from types.rs
        crate::types::ArticleId,
        crate::types::ImageRef,
        crate::types::LinkRef,
        crate::types::RichTextViewModel,
        crate::types::Seo,
        crate::types::Article,
        crate::types::UnlockRequest,
        crate::types::UnlockResponse,
        crate::types::UnlockErrorBody,
        crate::types::GateEvent,
        crate::gate::ViewKind,

        // API request/response types from routes
        crate::api::routes::ArticleList,
        crate::api::routes::ArticleQuery,
        crate::api::routes::GateForm,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "gate", description = "Unlock endpoint - Exchange an access token for a gated body"),
        (name = "articles", description = "Articles - Prepared articles and published slugs"),
        (name = "pages", description = "Pages - Server-rendered article pages with the gate form"),
        (name = "system", description = "System endpoints - Health checks and OpenAPI spec"),
    )
)]
pub struct ApiDoc;
