//! Wire models for the deployment-management service

pub mod models;
pub mod paths;

pub use models::{DeploymentDefinition, ErrorResponse};
