//! Model introspection handlers

use crate::api::rest::state::AppState;
use crate::error::ApiError;
use axum::{extract::State, http::Uri, Json};
use serde::{Deserialize, Serialize};
use setpoint_model::ModelDescriptor;
use setpoint_types::ProtocolMode;

/// Loaded model and the way connections use it
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelInfoResponse {
    #[serde(flatten)]
    pub model: ModelDescriptor,
    pub scale: f64,
    pub protocol: ProtocolMode,
}

/// Describe the loaded model
pub async fn model_info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        model: state.recommender.model().descriptor(),
        scale: state.recommender.scale(),
        protocol: state.mode,
    })
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(uri.path().to_string())
}
