//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::pipeline::ollama::{LlmClient, OllamaClient};

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub ollama_reachable: bool,
    pub ollama_url: String,
}

/// `GET /health`: service liveness plus Ollama reachability.
pub async fn check(State(ctx): State<ApiContext>) -> Result<Json<HealthResponse>, ApiError> {
    let config = ctx.config.clone();
    let ollama_reachable = tokio::task::spawn_blocking(move || {
        OllamaClient::from_config(&config).map(|client| client.is_reachable())
    })
    .await
    .map_err(|e| ApiError::Internal(e.to_string()))?
    .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(HealthResponse {
        status: "ok",
        version: crate::config::APP_VERSION,
        ollama_reachable,
        ollama_url: ctx.config.ollama_url.clone(),
    }))
}
