//! Configuration for setpoint-daemon

use serde::{Deserialize, Serialize};
use setpoint_types::{ProtocolMode, DEFAULT_SCALE};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Main daemon configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Connection protocol configuration
    #[serde(default)]
    pub protocol: ProtocolConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8000)),
            enable_cors: true,
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the generator artifact
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Normalization divisor and de-normalization multiplier
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Override for the artifact's reporting precision
    #[serde(default)]
    pub precision: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            scale: DEFAULT_SCALE,
            precision: None,
        }
    }
}

/// Protocol configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Per-message failure handling
    #[serde(default)]
    pub mode: ProtocolMode,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_model_path() -> PathBuf {
    PathBuf::from("generator.json")
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration from file
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Load configuration, reading `SETPOINT_*` variables from `env` instead
    /// of the process environment when given
    pub fn load_with_env(
        path: Option<&str>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        // Add default configuration
        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        // Add environment variables with SETPOINT_ prefix; nesting uses `__`
        builder = builder.add_source(
            config::Environment::with_prefix("SETPOINT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        builder.build()?.try_deserialize()
    }

    /// Check values the type system cannot
    pub fn validate(&self) -> Result<(), String> {
        if !self.model.scale.is_finite() || self.model.scale <= 0.0 {
            return Err(format!(
                "model.scale must be a positive number, got {}",
                self.model.scale
            ));
        }
        if let Some(precision) = self.model.precision {
            if precision > setpoint_types::MAX_PRECISION {
                return Err(format!(
                    "model.precision must be at most {}, got {}",
                    setpoint_types::MAX_PRECISION,
                    precision
                ));
            }
        }
        Ok(())
    }
}
