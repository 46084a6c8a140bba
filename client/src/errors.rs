//! Error types for the deployment client

use std::fmt;
use std::time::Duration;

use deploy_api::ErrorResponse;
use thiserror::Error;

use crate::classify::Diagnostic;

/// Main error type for the deployment client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    #[error("Address error: {0}")]
    Address(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("Received unexpected response; {0}")]
    UnexpectedResponse(Diagnostic),

    #[error("Gave up after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        last: Box<ClientError>,
    },

    #[error("Call cancelled")]
    Cancelled,
}

impl ClientError {
    /// Whether a failed attempt may be repeated.
    ///
    /// Only failures that happened before a response was decoded qualify.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Transport(_) | ClientError::RateLimited { .. }
        )
    }

    /// The error of the final attempt when retries ran out, otherwise `self`.
    pub fn last_error(&self) -> &ClientError {
        match self {
            ClientError::RetryExhausted { last, .. } => last,
            other => other,
        }
    }
}

/// Failure to carry a request to the service and decode its reply
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request timed out")]
    Timeout,

    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err.to_string())
        } else if err.is_decode() {
            TransportError::Decode(err.to_string())
        } else {
            TransportError::Request(err.to_string())
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.into())
    }
}

/// A structured error reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteError {
    pub message: String,
    pub code: Option<u16>,
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<ErrorResponse> for RemoteError {
    fn from(resp: ErrorResponse) -> Self {
        Self {
            message: resp.message,
            code: resp.code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::render_diagnostic;

    #[test]
    fn test_retryable_kinds() {
        assert!(ClientError::Transport(TransportError::Timeout).is_retryable());
        assert!(ClientError::RateLimited {
            retry_after: Duration::from_secs(1)
        }
        .is_retryable());

        assert!(!ClientError::Cancelled.is_retryable());
        assert!(!ClientError::UnexpectedResponse(render_diagnostic(&serde_json::json!([]))).is_retryable());
        assert!(!ClientError::Remote(RemoteError {
            message: "quota exceeded".to_string(),
            code: None,
        })
        .is_retryable());
    }

    #[test]
    fn test_last_error_unwraps_exhaustion() {
        let last = ClientError::Transport(TransportError::Connect("refused".to_string()));
        let err = ClientError::RetryExhausted {
            attempts: 3,
            last: Box::new(last.clone()),
        };
        assert_eq!(err.last_error(), &last);
        assert_eq!(last.last_error(), &last);
    }

    #[test]
    fn test_remote_error_display() {
        let err = RemoteError::from(ErrorResponse {
            message: "quota exceeded".to_string(),
            code: Some(429),
        });
        assert_eq!(err.to_string(), "quota exceeded (code 429)");
        assert_eq!(
            ClientError::from(err).to_string(),
            "Remote error: quota exceeded (code 429)"
        );
    }
}
