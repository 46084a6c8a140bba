//! API models

use serde::{Deserialize, Deserializer, Serialize};

/// A deployment, either as requested by the caller or as reported by the service.
///
/// `id` and `status` are what make a payload a deployment; everything else is
/// optional and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentDefinition {
    /// Deployment identifier
    pub id: String,

    /// Current or desired status, e.g. 'pending', 'ready'
    pub status: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Deployment settings, owned by the calling domain
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub spec: serde_json::Value,
}

impl DeploymentDefinition {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            name: None,
            spec: serde_json::Value::Null,
        }
    }
}

/// Error response returned by the service
///
/// Only `message` decides the shape. A `code` that is not a status-sized
/// number (a symbolic string, an out-of-range integer) reads as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,

    #[serde(
        default,
        deserialize_with = "lenient_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub code: Option<u16>,
}

fn lenient_code<'de, D>(deserializer: D) -> Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_u64().and_then(|code| u16::try_from(code).ok()))
}
