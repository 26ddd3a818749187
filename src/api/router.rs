//! HTTP router for the upload front end.

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::config::AppConfig;

/// Build the router: upload page, upload endpoint, health check.
///
/// Request bodies are capped at `config.max_content_length`; overruns are
/// answered with 413.
pub fn analyzer_router(config: Arc<AppConfig>) -> Router {
    let body_limit = config.max_content_length;
    let ctx = ApiContext::new(config);

    Router::new()
        .route("/", get(endpoints::page::index))
        .route("/upload", post(endpoints::upload::upload))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
}
