//! REST and WebSocket routes

pub mod handlers;
pub mod router;
pub mod state;
