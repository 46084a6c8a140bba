//! Outbound admission control
//!
//! One [`RateLimiter`] is shared by every endpoint a client builds, including
//! each attempt of a retried call. It never queues: a call over budget is
//! rejected with [`ClientError::RateLimited`] before the wrapped endpoint runs.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use deploy_api::DeploymentDefinition;
use governor::clock::{Clock, DefaultClock};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::Quota;
use tokio_util::sync::CancellationToken;
use tower::Layer;
use tracing::debug;

use crate::endpoint::{CallEndpoint, RawResponse};
use crate::errors::ClientError;

/// Token bucket configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitOptions {
    /// Time to earn one token
    pub refill_interval: Duration,

    /// Bucket capacity
    pub burst: u32,
}

impl Default for RateLimitOptions {
    fn default() -> Self {
        Self {
            refill_interval: Duration::from_secs(1),
            burst: 100,
        }
    }
}

impl RateLimitOptions {
    fn quota(&self) -> Result<Quota, ClientError> {
        let burst = NonZeroU32::new(self.burst)
            .ok_or_else(|| ClientError::Config("rate limit burst must be positive".to_string()))?;
        let quota = Quota::with_period(self.refill_interval).ok_or_else(|| {
            ClientError::Config("rate limit refill interval must be positive".to_string())
        })?;
        Ok(quota.allow_burst(burst))
    }
}

/// Token bucket safe for concurrent use
pub struct RateLimiter<C = DefaultClock>
where
    C: Clock,
{
    bucket: governor::RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<C::Instant>>,
}

impl RateLimiter {
    pub fn new(options: &RateLimitOptions) -> Result<Self, ClientError> {
        Self::with_clock(options, DefaultClock::default())
    }
}

impl<C> RateLimiter<C>
where
    C: Clock,
{
    /// Build a limiter driven by `clock`; tests pass a fake clock here.
    pub fn with_clock(options: &RateLimitOptions, clock: C) -> Result<Self, ClientError> {
        let quota = options.quota()?;
        Ok(Self {
            bucket: governor::RateLimiter::direct_with_clock(quota, clock),
        })
    }

    /// Take one token, or report how long until one is available.
    pub fn check(&self) -> Result<(), ClientError> {
        self.bucket.check().map_err(|not_until| ClientError::RateLimited {
            retry_after: not_until.wait_time_from(self.bucket.clock().now()),
        })
    }
}

/// Layer putting a shared [`RateLimiter`] in front of an endpoint
pub struct RateLimitLayer<C = DefaultClock>
where
    C: Clock,
{
    limiter: Arc<RateLimiter<C>>,
}

impl<C> RateLimitLayer<C>
where
    C: Clock,
{
    pub fn new(limiter: Arc<RateLimiter<C>>) -> Self {
        Self { limiter }
    }
}

impl<C> Clone for RateLimitLayer<C>
where
    C: Clock,
{
    fn clone(&self) -> Self {
        Self {
            limiter: Arc::clone(&self.limiter),
        }
    }
}

impl<S, C> Layer<S> for RateLimitLayer<C>
where
    C: Clock,
{
    type Service = RateLimited<S, C>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimited {
            inner,
            limiter: Arc::clone(&self.limiter),
        }
    }
}

/// Endpoint that only runs its inner endpoint when the limiter admits the call
pub struct RateLimited<E, C = DefaultClock>
where
    C: Clock,
{
    inner: E,
    limiter: Arc<RateLimiter<C>>,
}

#[async_trait]
impl<E, C> CallEndpoint for RateLimited<E, C>
where
    E: CallEndpoint,
    C: Clock + Send + Sync,
    C::Instant: Send + Sync,
{
    async fn invoke(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError> {
        if let Err(e) = self.limiter.check() {
            debug!("Call rejected by rate limiter: {}", e);
            return Err(e);
        }
        self.inner.invoke(ctx, request).await
    }
}
