//! Health and status handlers

use crate::api::rest::state::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    pub status: String,
    pub version: String,
    pub uptime: String,
    pub active_sessions: usize,
    pub sessions_opened: u64,
    pub messages_handled: u64,
    pub messages_failed: u64,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime: state.uptime(),
        active_sessions: state.stats.active(),
        sessions_opened: state.stats.opened(),
        messages_handled: state.stats.messages(),
        messages_failed: state.stats.failures(),
    })
}
