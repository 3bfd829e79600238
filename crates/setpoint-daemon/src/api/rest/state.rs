//! Application state for API handlers

use crate::session::{Session, SessionStats};
use setpoint_model::Recommender;
use setpoint_types::ProtocolMode;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Shared, read-only recommendation pipeline
    pub recommender: Arc<Recommender>,

    /// Per-message failure handling for new connections
    pub mode: ProtocolMode,

    /// Session counters
    pub stats: Arc<SessionStats>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(recommender: Arc<Recommender>, mode: ProtocolMode) -> Self {
        Self {
            recommender,
            mode,
            stats: Arc::new(SessionStats::default()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Start a session for a newly connected client
    pub fn open_session(&self) -> Session {
        Session::new(self.recommender.clone(), self.mode, self.stats.clone())
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
