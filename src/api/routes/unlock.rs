//! Unlock endpoint handler.

use super::client_identity;
use crate::api::AppState;
use crate::api::error_response::UnlockFailure;
use crate::types::{UnlockRequest, UnlockResponse};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};

/// POST /api/gated-content - Exchange an access token for an article body
#[utoipa::path(
    post,
    path = "/api/gated-content",
    tag = "gate",
    request_body = UnlockRequest,
    responses(
        (status = 200, description = "Full body of the article", body = UnlockResponse),
        (status = 400, description = "Malformed request", body = crate::types::UnlockErrorBody),
        (status = 401, description = "Access token not accepted", body = crate::types::UnlockErrorBody),
        (status = 404, description = "No article with this slug", body = crate::types::UnlockErrorBody),
        (status = 500, description = "Internal server error", body = crate::types::UnlockErrorBody)
    )
)]
pub async fn unlock_content(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<UnlockRequest>, JsonRejection>,
) -> Result<Response, UnlockFailure> {
    let Json(request) = payload?;
    let identity = client_identity(&headers);

    let body = state.access.unlock_body(&request, identity).await?;

    let mut response = Json(UnlockResponse { body }).into_response();
    // Unlocked bodies must never be shared by caches
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    Ok(response)
}
