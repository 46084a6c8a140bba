//! Logging configuration
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the embedding program, which may use [`init_logging`] for a ready-made one.

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::ClientError;

/// Log level configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[serde(alias = "warning")]
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ClientError::Config(format!("Invalid log level: {}", s))),
        }
    }
}

/// Logging options
#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    /// Level for this crate's events
    pub log_level: LogLevel,

    /// Emit JSON lines instead of human-readable text
    pub json_format: bool,
}

impl LogOptions {
    /// Filter used when `RUST_LOG` is not set: the configured level for the
    /// client, warnings and above for everything else.
    pub fn default_directives(&self) -> String {
        format!("warn,deploy_client={}", self.log_level.as_str())
    }
}

/// Install a global subscriber writing to stdout
pub fn init_logging(options: LogOptions) -> Result<(), ClientError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.default_directives()));

    let subscriber = tracing_subscriber::registry().with(filter);

    let result = if options.json_format {
        subscriber.with(fmt::layer().json()).try_init()
    } else {
        subscriber.with(fmt::layer()).try_init()
    };

    result.map_err(|e| ClientError::Config(format!("unable to initialize logging: {}", e)))
}
