//! Error types for idea-intake

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntakeError {
    #[error("{0}")]
    BadRequest(String),

    #[error("unsupported audio type: {0}")]
    UnsupportedMedia(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("store lock poisoned")]
    LockPoisoned,

    #[error("upstream service error: {0}")]
    Upstream(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl IntakeError {
    fn status(&self) -> StatusCode {
        match self {
            IntakeError::BadRequest(_) | IntakeError::UnsupportedMedia(_) => {
                StatusCode::BAD_REQUEST
            }
            IntakeError::Upstream(_) | IntakeError::Http(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors cross the HTTP boundary as `{ok: false, error}` payloads.
impl IntoResponse for IntakeError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(json!({ "ok": false, "error": self.to_string() }))).into_response()
    }
}
