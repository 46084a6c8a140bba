//! Utility functions

use serde::Serialize;

/// Build information for the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_time: &'static str,
}

/// Get version information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        version: env!("CARGO_PKG_VERSION"),
        git_hash: option_env!("DEPLOY_CLIENT_GIT_HASH").unwrap_or("unknown"),
        build_time: option_env!("DEPLOY_CLIENT_BUILD_TIME").unwrap_or("unknown"),
    }
}

/// User-Agent sent with every request, e.g. `deploy-client/0.1.0 (3f2a9c1)`
pub fn user_agent() -> String {
    let info = version_info();
    format!("{}/{} ({})", env!("CARGO_PKG_NAME"), info.version, info.git_hash)
}
