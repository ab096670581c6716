//! Health check handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub environment: String,
    pub cached_queries: usize,
}

/// Health check endpoint handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.clone(),
        cached_queries: state.rpc.cached_queries().await,
    })
}

/// Drop every cached RPC query result
pub async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.rpc.invalidate_all().await;
    tracing::info!("Query cache cleared");
    StatusCode::NO_CONTENT
}
