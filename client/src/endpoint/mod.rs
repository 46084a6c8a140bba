//! Call endpoints and the layers that wrap them
//!
//! A [`CallEndpoint`] is one remote operation: hand it a request, get back the
//! decoded reply or an error. What the reply means is decided later by
//! [`crate::classify`].
//!
//! Cross-cutting behaviour is added with [`tower::Layer`] values, so endpoints
//! compose with [`tower::ServiceBuilder`]. The first `.layer(..)` call is the
//! outermost wrapper:
//!
//! ```text
//! ServiceBuilder::new()
//!     .layer(RateLimitLayer)   // admission control, outermost
//!     .layer(TraceLayer)       // one span per admitted call
//!     .service(HttpEndpoint)   // encode -> transmit -> decode
//! ```

pub mod rate_limit;
pub mod trace;

use std::sync::Arc;

use async_trait::async_trait;
use deploy_api::DeploymentDefinition;
use tokio_util::sync::CancellationToken;

use crate::errors::ClientError;

pub use rate_limit::{RateLimitLayer, RateLimitOptions, RateLimited, RateLimiter};
pub use trace::{TraceLayer, Traced};

/// Decoded reply of a single invocation
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// Transport status code (HTTP status for the HTTP transport)
    pub status: u16,

    /// Decoded body, not yet classified
    pub body: serde_json::Value,
}

/// One remote operation with a uniform call contract
#[async_trait]
pub trait CallEndpoint: Send + Sync {
    /// Invoke the operation.
    ///
    /// `Err` means nothing usable came back (connection, timeout, undecodable
    /// body, admission denied, cancellation). Any decoded reply is `Ok`,
    /// including one that describes a remote failure.
    async fn invoke(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError>;
}

/// Type-erased endpoint as stored by [`crate::DeploymentClient`]
pub type BoxEndpoint = Box<dyn CallEndpoint>;

#[async_trait]
impl<E> CallEndpoint for Arc<E>
where
    E: CallEndpoint + ?Sized,
{
    async fn invoke(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError> {
        (**self).invoke(ctx, request).await
    }
}

#[async_trait]
impl<E> CallEndpoint for Box<E>
where
    E: CallEndpoint + ?Sized,
{
    async fn invoke(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError> {
        (**self).invoke(ctx, request).await
    }
}
