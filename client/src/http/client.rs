//! HTTP transport endpoint

use std::time::Duration;

use async_trait::async_trait;
use deploy_api::DeploymentDefinition;
use ::http::Method;
use reqwest::{header, Client};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::endpoint::{CallEndpoint, RawResponse};
use crate::errors::{ClientError, TransportError};
use crate::utils::user_agent;

/// Header carrying a fresh identifier for every attempt
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

/// Most bytes of an undecodable body that make it into the log
const LOGGED_BODY_LIMIT: usize = 512;

/// Build the HTTP client shared by all endpoints of one deployment client
pub fn build_http_client(request_timeout: Duration) -> Result<Client, ClientError> {
    Client::builder()
        .timeout(request_timeout)
        .user_agent(user_agent())
        .build()
        .map_err(|e| ClientError::Config(format!("unable to build HTTP client: {}", e)))
}

/// One operation of the remote service reached over HTTP
///
/// The request is sent as JSON and the body of any reply is decoded as JSON,
/// whatever the status code; deciding what the body means is left to the
/// classifier.
pub struct HttpEndpoint {
    client: Client,
    method: Method,
    url: Url,
}

impl HttpEndpoint {
    pub fn new(client: Client, method: Method, url: Url) -> Self {
        Self {
            client,
            method,
            url,
        }
    }

    /// Endpoint issuing `POST` requests, as both service operations expect
    pub fn post(client: Client, url: Url) -> Self {
        Self::new(client, Method::POST, url)
    }

    async fn send(&self, request: &DeploymentDefinition) -> Result<RawResponse, ClientError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!("{} {} ({})", self.method, self.url, request_id);

        let response = self
            .client
            .request(self.method.clone(), self.url.clone())
            .header(header::ACCEPT, "application/json")
            .header(REQUEST_ID_HEADER, &request_id)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            warn!(
                "HTTP {} {} returned undecodable body: {} - {}",
                self.method,
                self.url,
                status,
                body_excerpt(&bytes, LOGGED_BODY_LIMIT)
            );
            TransportError::Decode(e.to_string())
        })?;

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

/// Lossy text of at most `limit` bytes of `bytes`, marked when cut short
fn body_excerpt(bytes: &[u8], limit: usize) -> String {
    if bytes.len() <= limit {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    format!(
        "{}... ({} bytes total)",
        String::from_utf8_lossy(&bytes[..limit]),
        bytes.len()
    )
}

#[async_trait]
impl CallEndpoint for HttpEndpoint {
    async fn invoke(
        &self,
        ctx: &CancellationToken,
        request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError> {
        tokio::select! {
            _ = ctx.cancelled() => Err(ClientError::Cancelled),
            result = self.send(request) => result,
        }
    }
}
