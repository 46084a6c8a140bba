//! Per-call tracing

use async_trait::async_trait;
use deploy_api::DeploymentDefinition;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tower::Layer;
use tracing::{debug, info_span, warn, Instrument};

use crate::endpoint::{CallEndpoint, RawResponse};
use crate::errors::ClientError;

/// Layer opening one span per invocation, named after the operation
#[derive(Debug, Clone, Copy)]
pub struct TraceLayer {
    operation: &'static str,
}

impl TraceLayer {
    pub fn new(operation: &'static str) -> Self {
        Self { operation }
    }
}

impl<S> Layer<S> for TraceLayer {
    type Service = Traced<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Traced {
            inner,
            operation: self.operation,
        }
    }
}

pub struct Traced<E> {
    inner: E,
    operation: &'static str,
}

#[async_trait]
impl<E> CallEndpoint for Traced<E>
where
    E: CallEndpoint,
{
    async fn invoke(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError> {
        let span = info_span!("call", operation = self.operation, deployment = %request.id);

        async {
            let started = Instant::now();
            let result = self.inner.invoke(ctx, request).await;
            let elapsed_ms = started.elapsed().as_millis() as u64;

            match &result {
                Ok(response) => {
                    debug!(status = response.status, elapsed_ms, "Call completed");
                }
                Err(ClientError::Cancelled) => {
                    debug!(elapsed_ms, "Call cancelled");
                }
                Err(e) => {
                    warn!(elapsed_ms, "Call failed: {}", e);
                }
            }

            result
        }
        .instrument(span)
        .await
    }
}
