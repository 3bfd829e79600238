//! Setpoint daemon library
//!
//! This module provides the core components for the setpoint daemon:
//! - WebSocket inference endpoint and health/model handlers
//! - Per-connection session loop
//! - Configuration and server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod session;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, DaemonResult};
pub use server::Server;
pub use session::{Session, SessionEnd, SessionState, SessionStats};
