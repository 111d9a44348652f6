//! HTTP error response handling for the API
//!
//! General endpoints answer with the [`ApiError`] envelope. The unlock endpoint
//! keeps the flat `{ "message": ... }` payload its clients parse, wrapped in
//! [`UnlockFailure`].

use crate::error::{ApiError, Error, ToHttpStatus};
use crate::types::UnlockErrorBody;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Implement IntoResponse for Error to automatically convert errors to HTTP responses
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status_code.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let api_error: ApiError = self.into();

        (status_code, Json(api_error)).into_response()
    }
}

/// Error response of the unlock endpoint
#[derive(Debug)]
pub struct UnlockFailure {
    status: StatusCode,
    body: UnlockErrorBody,
}

impl UnlockFailure {
    /// HTTP status of the response
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<Error> for UnlockFailure {
    fn from(error: Error) -> Self {
        let status =
            StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        Self {
            status,
            body: UnlockErrorBody {
                message: error.to_string(),
                code: Some(error.error_code().to_string()),
            },
        }
    }
}

impl From<JsonRejection> for UnlockFailure {
    fn from(rejection: JsonRejection) -> Self {
        Self {
            status: rejection.status(),
            body: UnlockErrorBody {
                message: rejection.body_text(),
                code: Some("invalid_request".to_string()),
            },
        }
    }
}

impl IntoResponse for UnlockFailure {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
