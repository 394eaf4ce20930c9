use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::ServiceError;

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl ErrorResponse {
    pub(crate) fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: status.as_u16(),
            message: message.into(),
        }
    }

    pub(crate) fn bad_request(message: impl Into<String>) -> Response {
        Self::new(StatusCode::BAD_REQUEST, message).into_response()
    }

    /// Map a service failure to its HTTP status, logging server-side errors.
    pub(crate) fn from_service_error(error: &ServiceError) -> Response {
        let status = error.status_code();
        if status.is_server_error() {
            tracing::error!(error = %error, "Request failed");
        } else {
            tracing::debug!(error = %error, status = status.as_u16(), "Request rejected");
        }
        Self::new(status, error.to_string()).into_response()
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
