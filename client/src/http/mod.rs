//! HTTP transport for the deployment service

pub mod address;
pub mod client;

pub use address::{normalize_instance, operation_url};
pub use client::{build_http_client, HttpEndpoint};
