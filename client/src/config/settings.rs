//! Settings file management

use std::path::Path;
use std::time::Duration;

use deploy_api::paths;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::options::{ClientOptions, OperationPaths};
use crate::endpoint::RateLimitOptions;
use crate::errors::ClientError;
use crate::logs::{LogLevel, LogOptions};
use crate::retry::RetryPolicy;

/// Client settings as stored on disk (JSON)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Remote instance address
    #[serde(default = "default_instance")]
    pub instance: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit JSON logs
    #[serde(default)]
    pub json_logs: bool,

    /// Outbound rate limit
    #[serde(default)]
    pub rate_limit: RateLimitSettings,

    /// Create-path retry
    #[serde(default)]
    pub retry: RetrySettings,

    /// Timeout of a single HTTP attempt in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Operation paths
    #[serde(default)]
    pub paths: PathSettings,
}

fn default_instance() -> String {
    ClientOptions::default().instance
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            instance: default_instance(),
            log_level: LogLevel::Info,
            json_logs: false,
            rate_limit: RateLimitSettings::default(),
            retry: RetrySettings::default(),
            request_timeout_secs: default_request_timeout(),
            paths: PathSettings::default(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(raw: &str) -> Result<Self, ClientError> {
        serde_json::from_str(raw)
            .map_err(|e| ClientError::Config(format!("invalid settings: {}", e)))
    }

    /// Read settings from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        debug!("Loading settings from {}", path.display());

        let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
            ClientError::Config(format!("unable to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&raw)
    }

    /// Runtime options described by these settings
    pub fn to_options(&self) -> ClientOptions {
        ClientOptions {
            instance: self.instance.clone(),
            rate_limit: RateLimitOptions {
                refill_interval: Duration::from_millis(self.rate_limit.refill_interval_ms),
                burst: self.rate_limit.burst,
            },
            retry: RetryPolicy {
                interval: Duration::from_millis(self.retry.interval_ms),
                max_attempts: self.retry.max_attempts,
            },
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            paths: OperationPaths {
                create: self.paths.create.clone(),
                get: self.paths.get.clone(),
            },
        }
    }

    /// Logging options described by these settings
    pub fn log_options(&self) -> LogOptions {
        LogOptions {
            log_level: self.log_level,
            json_format: self.json_logs,
        }
    }
}

/// Rate limit settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitSettings {
    /// Milliseconds to earn one request token
    #[serde(default = "default_refill_interval_ms")]
    pub refill_interval_ms: u64,

    /// Bucket capacity
    #[serde(default = "default_burst")]
    pub burst: u32,
}

fn default_refill_interval_ms() -> u64 {
    1000
}

fn default_burst() -> u32 {
    100
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            refill_interval_ms: default_refill_interval_ms(),
            burst: default_burst(),
        }
    }
}

/// Retry settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Milliseconds between attempts
    #[serde(default = "default_retry_interval_ms")]
    pub interval_ms: u64,

    /// Maximum attempts, the first one included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_retry_interval_ms() -> u64 {
    2000
}

fn default_max_attempts() -> u32 {
    31
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            interval_ms: default_retry_interval_ms(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Operation path settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSettings {
    #[serde(default = "default_create_path")]
    pub create: String,

    #[serde(default = "default_get_path")]
    pub get: String,
}

fn default_create_path() -> String {
    paths::CREATE_DEPLOYMENT.to_string()
}

fn default_get_path() -> String {
    paths::GET_LATEST_DEPLOYMENT.to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            create: default_create_path(),
            get: default_get_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_matches_default_options() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.to_options(), ClientOptions::default());
    }

    #[test]
    fn test_partial_document() {
        let settings = Settings::from_json(
            r#"{
                "instance": "deployer.internal:9000",
                "log_level": "debug",
                "retry": {"max_attempts": 3},
                "rate_limit": {"burst": 10},
                "paths": {"get": "/kfctl/apps/v1alpha1/create"}
            }"#,
        )
        .unwrap();

        let options = settings.to_options();
        assert_eq!(options.instance, "deployer.internal:9000");
        assert_eq!(options.retry.max_attempts, 3);
        assert_eq!(options.retry.interval, Duration::from_secs(2));
        assert_eq!(options.rate_limit.burst, 10);
        assert_eq!(options.rate_limit.refill_interval, Duration::from_secs(1));
        assert_eq!(options.paths.create, options.paths.get);
        assert_eq!(settings.log_options().log_level, LogLevel::Debug);
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            Settings::from_json("{\"retry\": {\"max_attempts\": -1}}"),
            Err(ClientError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let result = Settings::load("/nonexistent/deploy-client.json").await;
        assert!(matches!(result, Err(ClientError::Config(_))));
    }
}
