//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use setpoint_model::Recommender;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Setpoint Daemon Server
pub struct Server {
    config: DaemonConfig,
    recommender: Arc<Recommender>,
}

impl Server {
    /// Load the model and prepare the server. Fails if the artifact is
    /// missing or invalid.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        config.validate().map_err(DaemonError::Config)?;

        let mut model = setpoint_model::load(&config.model.path)?;
        if let Some(precision) = config.model.precision {
            model = model.with_precision(precision)?;
        }

        let recommender = Recommender::new(model).with_scale(config.model.scale);

        Ok(Self::with_recommender(config, Arc::new(recommender)))
    }

    /// Prepare the server around an already loaded model
    pub fn with_recommender(config: DaemonConfig, recommender: Arc<Recommender>) -> Self {
        Self {
            config,
            recommender,
        }
    }

    /// Router serving this server's state
    pub fn router(&self) -> axum::Router {
        let state = AppState::new(self.recommender.clone(), self.config.protocol.mode);
        create_router(state, self.config.server.enable_cors)
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;
        let app = self.router();

        // Create listener
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Setpoint daemon listening on {}", addr);
        tracing::info!("Protocol mode: {}", self.config.protocol.mode);

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Setpoint daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
