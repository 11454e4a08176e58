//! Error types for the audit engine.
//!
//! `AppError` is the single crate-wide error type. Transport failures during
//! a crawl (a page timing out, a 500 from the target site) are never routed
//! through this type - they become `PageRecord.error` / `fetch_errors`
//! entries. `AppError` only exists at the boundaries where a request must
//! genuinely fail: URL validation, token auth, and narrator unavailability.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("invalid api token")]
    Unauthorized,

    #[error("server misconfigured: {0}")]
    ServerMisconfigured(String),

    #[error("{0}")]
    LlmUnavailable(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::ServerMisconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::LlmUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({ "detail": self.to_string() }));
        (status, body).into_response()
    }
}
