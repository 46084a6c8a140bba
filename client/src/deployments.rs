//! Deployment API client

use std::sync::Arc;

use deploy_api::DeploymentDefinition;
use tokio_util::sync::CancellationToken;
use tower::ServiceBuilder;
use tracing::{debug, error, info};

use crate::classify::{classify, RemoteOutcome};
use crate::config::ClientOptions;
use crate::endpoint::{BoxEndpoint, CallEndpoint, RateLimitLayer, RateLimiter, TraceLayer};
use crate::errors::ClientError;
use crate::http::{build_http_client, normalize_instance, operation_url, HttpEndpoint};
use crate::retry::RetryPolicy;

const CREATE_OPERATION: &str = "create_deployment";
const GET_OPERATION: &str = "get_latest_deployment";

/// Client for the deployment-management service
///
/// Owns one endpoint per operation. Both share a single rate limiter, so the
/// limit bounds the total outgoing request rate of this client, retries
/// included. Safe to share between tasks.
pub struct DeploymentClient {
    create_endpoint: BoxEndpoint,
    get_endpoint: BoxEndpoint,
    retry: RetryPolicy,
}

impl DeploymentClient {
    /// Create a client talking HTTP to the configured instance
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        options.validate()?;

        let base_url = normalize_instance(&options.instance)?;
        let limiter = Arc::new(RateLimiter::new(&options.rate_limit)?);
        let http_client = build_http_client(options.request_timeout)?;

        let create_endpoint = ServiceBuilder::new()
            .layer(RateLimitLayer::new(Arc::clone(&limiter)))
            .layer(TraceLayer::new(CREATE_OPERATION))
            .service(HttpEndpoint::post(
                http_client.clone(),
                operation_url(&base_url, &options.paths.create)?,
            ));

        let get_endpoint = ServiceBuilder::new()
            .layer(RateLimitLayer::new(limiter))
            .layer(TraceLayer::new(GET_OPERATION))
            .service(HttpEndpoint::post(
                http_client,
                operation_url(&base_url, &options.paths.get)?,
            ));

        info!("Deployment client targeting {}", base_url);

        Self::from_endpoints(create_endpoint, get_endpoint, options.retry)
    }

    /// Create a client around caller-supplied endpoints
    pub fn from_endpoints<C, G>(
        create_endpoint: C,
        get_endpoint: G,
        retry: RetryPolicy,
    ) -> Result<Self, ClientError>
    where
        C: CallEndpoint + 'static,
        G: CallEndpoint + 'static,
    {
        retry.validate()?;

        Ok(Self {
            create_endpoint: Box::new(create_endpoint),
            get_endpoint: Box::new(get_endpoint),
            retry,
        })
    }

    /// Create a deployment.
    ///
    /// Transport failures and rate-limit rejections are retried under the
    /// client's [`RetryPolicy`]; any decoded reply ends the loop and is
    /// classified once.
    pub async fn create_deployment(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<DeploymentDefinition, ClientError> {
        let endpoint = &self.create_endpoint;

        let raw = self
            .retry
            .run(ctx, move |attempt| {
                debug!("{} attempt {} for {}", CREATE_OPERATION, attempt, request.id);
                endpoint.invoke(ctx, request)
            })
            .await?;

        resolve(CREATE_OPERATION, classify(raw))
    }

    /// Fetch the latest state of the deployment described by `request`.
    ///
    /// Single attempt: whether repeating a read is safe is left to the caller.
    pub async fn get_latest_deployment(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<DeploymentDefinition, ClientError> {
        if ctx.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        let raw = self.get_endpoint.invoke(ctx, request).await?;

        resolve(GET_OPERATION, classify(raw))
    }
}

fn resolve(operation: &str, outcome: RemoteOutcome) -> Result<DeploymentDefinition, ClientError> {
    match &outcome {
        RemoteOutcome::Domain(deployment) => {
            debug!("{} returned deployment {} ({})", operation, deployment.id, deployment.status);
        }
        RemoteOutcome::Remote(err) => {
            info!("{} rejected by service: {}", operation, err);
        }
        RemoteOutcome::Unclassified(diagnostic) => {
            error!("{} received unexpected response; {}", operation, diagnostic);
        }
    }

    outcome.into_result()
}
