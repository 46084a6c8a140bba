//! Client configuration options

use std::time::Duration;

use deploy_api::paths;

use crate::endpoint::RateLimitOptions;
use crate::errors::ClientError;
use crate::retry::RetryPolicy;

/// Everything needed to build a [`crate::DeploymentClient`]
#[derive(Debug, Clone, PartialEq)]
pub struct ClientOptions {
    /// Address of the remote instance; the scheme is optional
    pub instance: String,

    /// Outbound rate limit shared by both operations
    pub rate_limit: RateLimitOptions,

    /// Retry policy for the create path
    pub retry: RetryPolicy,

    /// Timeout of a single HTTP attempt
    pub request_timeout: Duration,

    /// Operation paths relative to the instance address
    pub paths: OperationPaths,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            instance: "localhost:8080".to_string(),
            rate_limit: RateLimitOptions::default(),
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
            paths: OperationPaths::default(),
        }
    }
}

impl ClientOptions {
    /// Options for `instance` with every other setting at its default
    pub fn for_instance(instance: impl Into<String>) -> Self {
        Self {
            instance: instance.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.retry.validate()?;
        if self.request_timeout.is_zero() {
            return Err(ClientError::Config(
                "request timeout must be positive".to_string(),
            ));
        }
        if self.paths.create.is_empty() || self.paths.get.is_empty() {
            return Err(ClientError::Config(
                "operation paths must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Per-operation paths.
///
/// Both may point at the same path when the backend tells the operations
/// apart by payload; classification then depends on what that handler returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationPaths {
    pub create: String,
    pub get: String,
}

impl Default for OperationPaths {
    fn default() -> Self {
        Self {
            create: paths::CREATE_DEPLOYMENT.to_string(),
            get: paths::GET_LATEST_DEPLOYMENT.to_string(),
        }
    }
}
