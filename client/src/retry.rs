//! Bounded, constant-interval retry

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::ClientError;

/// Retry settings for the create path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Wait between two attempts
    pub interval: Duration,

    /// Hard cap on attempts, the first one included
    pub max_attempts: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 31, // first attempt + 30 retries
        }
    }
}

impl RetryPolicy {
    pub fn new(interval: Duration, max_attempts: u32) -> Result<Self, ClientError> {
        let policy = Self {
            interval,
            max_attempts,
        };
        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        if self.max_attempts == 0 {
            return Err(ClientError::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Run `op` until it succeeds, fails with a non-retryable error, runs out
    /// of attempts, or `ctx` is cancelled.
    ///
    /// `op` receives the 1-based attempt number. Cancellation is observed
    /// before every attempt and during the wait between attempts.
    pub async fn run<T, F, Fut>(&self, ctx: &CancellationToken, mut op: F) -> Result<T, ClientError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            if ctx.is_cancelled() {
                debug!("Cancelled before attempt {}", attempt + 1);
                return Err(ClientError::Cancelled);
            }

            attempt += 1;
            let err = match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) => e,
            };

            if !err.is_retryable() {
                return Err(err);
            }

            if attempt >= self.max_attempts {
                warn!(
                    "Giving up after {} attempts in {:?}: {}",
                    attempt,
                    started.elapsed(),
                    err
                );
                return Err(ClientError::RetryExhausted {
                    attempts: attempt,
                    last: Box::new(err),
                });
            }

            warn!(
                "Attempt {}/{} failed: {}; retrying in {:?}",
                attempt, self.max_attempts, err, self.interval
            );

            tokio::select! {
                _ = ctx.cancelled() => {
                    debug!("Cancelled while waiting to retry");
                    return Err(ClientError::Cancelled);
                }
                _ = sleep(self.interval) => {}
            }
        }
    }
}
