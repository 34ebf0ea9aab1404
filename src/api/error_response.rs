//! HTTP error response handling for the API
//!
//! Converts domain errors to HTTP responses with the stable
//! `{"error": ..., "error_description": ...}` body.

use crate::error::{ApiError, Error, ToHttpStatus};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Clients only ever see the generic body for these
        if status_code.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let api_error = ApiError::from(&self);

        (status_code, Json(api_error)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Errors normally go through Error::into_response, which knows the status
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
