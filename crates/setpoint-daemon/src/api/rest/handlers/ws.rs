//! WebSocket inference endpoint

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::StreamExt;

/// Upgrade to a WebSocket and run a session on it
pub async fn ws_handler(
    State(state): State<AppState>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> ApiResult<Response> {
    let upgrade = upgrade.map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(upgrade.on_upgrade(move |socket| serve_socket(state, socket)))
}

async fn serve_socket(state: AppState, socket: WebSocket) {
    let session = state.open_session();
    let (outbound, inbound) = socket.split();

    session.run(inbound, outbound).await;
}
