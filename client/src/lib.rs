//! Deployment Client Library
//!
//! Rate-limited, retrying client for the deployment-management service.
//!
//! Call pipeline:
//!
//! ```text
//! create_deployment -> RetryPolicy -> RateLimited -> Traced -> HttpEndpoint -> classify
//! get_latest_deployment ---------->   RateLimited -> Traced -> HttpEndpoint -> classify
//! ```

pub mod classify;
pub mod config;
pub mod deployments;
pub mod endpoint;
pub mod errors;
pub mod http;
pub mod logs;
pub mod retry;
pub mod utils;

pub use classify::{classify, render_diagnostic, Diagnostic, RemoteOutcome};
pub use config::{ClientOptions, Settings};
pub use deploy_api::{DeploymentDefinition, ErrorResponse};
pub use deployments::DeploymentClient;
pub use endpoint::{CallEndpoint, RawResponse};
pub use errors::{ClientError, RemoteError, TransportError};
pub use retry::RetryPolicy;
