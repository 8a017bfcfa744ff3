//! HTTP error response handling for the API
//!
//! Converts service errors into the `{status:"error", msg:...}` wire shape
//! with an appropriate status code. Server-side faults (5xx) get a generic
//! client message; the detail goes to the logs only.

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

        let msg = if status_code.is_server_error() {
            tracing::error!(code = self.error_code(), error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status_code, Json(ApiError::new(msg))).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Direct ApiError conversions default to 500; errors normally go
        // through Error::into_response which carries the status code.
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}
