//! Setpoint Daemon - WebSocket setpoint recommendation service
//!
//! The setpoint daemon provides:
//! - A `/ws` endpoint returning recommended setpoints for each sensor reading
//! - Health and model introspection endpoints
//! - One-time model loading; the daemon refuses to start without a model

use clap::Parser;
use setpoint_daemon::{DaemonConfig, DaemonError, DaemonResult, Server};
use setpoint_types::ProtocolMode;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Setpoint Daemon CLI
#[derive(Parser)]
#[command(name = "setpointd")]
#[command(about = "Setpoint Daemon - WebSocket setpoint recommendation service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "SETPOINT_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "SETPOINT_LISTEN_ADDR")]
    listen: Option<String>,

    /// Generator artifact path
    #[arg(short, long, env = "SETPOINT_MODEL_PATH")]
    model: Option<PathBuf>,

    /// Protocol mode (resilient or strict)
    #[arg(short, long, env = "SETPOINT_PROTOCOL_MODE")]
    protocol: Option<String>,

    /// Log level
    #[arg(long, env = "SETPOINT_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "SETPOINT_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = &cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }
    if let Some(model) = cli.model {
        config.model.path = model;
    }
    if let Some(protocol) = &cli.protocol {
        config.protocol.mode = protocol
            .parse::<ProtocolMode>()
            .map_err(DaemonError::Config)?;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json {
        config.logging.json = true;
    }

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        model = %config.model.path.display(),
        listen = %config.server.listen_addr,
        "Starting setpoint daemon"
    );

    // Load the model before binding; a missing model is fatal
    let server = match Server::new(config) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            return Err(e);
        }
    };
    server.run().await
}
