use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// Request failures. Every variant is raised before the store is touched, so
/// a rejected request never leaves a partial write behind.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing, empty, mistyped or unknown request field.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Fingerprint token did not match.
    #[error("{0}")]
    Authentication(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Authentication(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

/// `{ "message": ... }`, the body shape of every non-2xx response.
pub fn message_body(message: impl Into<String>) -> Json<serde_json::Value> {
    Json(json!({ "message": message.into() }))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, message_body(self.to_string())).into_response()
    }
}
