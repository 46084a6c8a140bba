//! Operation paths, relative to the service instance address

/// Create (or update) a deployment
pub const CREATE_DEPLOYMENT: &str = "/kfctl/apps/v1alpha1/create";

/// Fetch the latest state of a deployment
pub const GET_LATEST_DEPLOYMENT: &str = "/kfctl/apps/v1alpha1/get";
