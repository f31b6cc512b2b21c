use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::resume::ResumeError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Resume(#[from] ResumeError),

    #[error("Failed to store upload: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Resume(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::BadRequest(msg) => tracing::warn!("Rejected upload: {msg}"),
            AppError::Resume(e) => tracing::error!("Resume parsing failed: {e}"),
            AppError::Storage(e) => tracing::error!("Upload storage error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
        }

        // Callers get the failure text itself, matching what the upload form displays.
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
