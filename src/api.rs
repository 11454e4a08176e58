//! HTTP API (§4, §6): `axum` router exposing `POST /report` and
//! `POST /analyze_summary`, enforcing the `X-API-Token` header before
//! handing the URL to the [`crate::orchestrator`].

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::orchestrator::Orchestrator;

const TOKEN_HEADER: &str = "x-api-token";

#[derive(Deserialize)]
pub struct AuditRequest {
    pub url: String,
}

/// Checks `API_TOKEN` config *before* comparing the supplied header, so a
/// misconfigured server surfaces 500 rather than a misleading 401.
fn check_token(orchestrator: &Orchestrator, headers: &HeaderMap) -> Result<()> {
    let expected = orchestrator.api_token();
    if expected.is_empty() {
        return Err(AppError::ServerMisconfigured("API_TOKEN is not configured".to_string()));
    }
    let supplied = headers.get(TOKEN_HEADER).and_then(|v| v.to_str().ok()).unwrap_or("");
    if supplied != expected {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

async fn report(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
    Json(body): Json<AuditRequest>,
) -> Result<Json<Value>> {
    check_token(&orchestrator, &headers)?;
    let report = orchestrator.run_report(&body.url).await?;
    Ok(Json(report))
}

async fn analyze_summary(
    State(orchestrator): State<Arc<Orchestrator>>,
    headers: HeaderMap,
    Json(body): Json<AuditRequest>,
) -> Result<Json<Value>> {
    check_token(&orchestrator, &headers)?;
    let sentences = orchestrator.run_summary(&body.url).await?;
    Ok(Json(serde_json::to_value(sentences).unwrap()))
}

pub fn router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/report", post(report))
        .route("/analyze_summary", post(analyze_summary))
        .with_state(orchestrator)
}
