//! Response classification
//!
//! A decoded reply is matched against the deployment shape first and the
//! structured-error shape second. A body satisfying both (say, one carrying
//! `id`, `status` and `message`) is therefore a deployment: success wins ties.

use std::fmt;

use deploy_api::{DeploymentDefinition, ErrorResponse};
use serde::Deserialize;
use serde_json::Value;

use crate::endpoint::RawResponse;
use crate::errors::{ClientError, RemoteError};

/// What a decoded reply turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// The service returned a deployment
    Domain(DeploymentDefinition),

    /// The service reported a structured error
    Remote(RemoteError),

    /// Neither shape matched
    Unclassified(Diagnostic),
}

impl RemoteOutcome {
    pub fn into_result(self) -> Result<DeploymentDefinition, ClientError> {
        match self {
            RemoteOutcome::Domain(deployment) => Ok(deployment),
            RemoteOutcome::Remote(err) => Err(ClientError::Remote(err)),
            RemoteOutcome::Unclassified(diagnostic) => {
                Err(ClientError::UnexpectedResponse(diagnostic))
            }
        }
    }
}

/// Classify a decoded reply.
///
/// A structured error without its own code inherits the transport status
/// when that status is not a success.
pub fn classify(raw: RawResponse) -> RemoteOutcome {
    let RawResponse { status, body } = raw;

    if let Ok(deployment) = DeploymentDefinition::deserialize(&body) {
        return RemoteOutcome::Domain(deployment);
    }

    if let Ok(resp) = ErrorResponse::deserialize(&body) {
        let mut err = RemoteError::from(resp);
        if err.code.is_none() && !(200..300).contains(&status) {
            err.code = Some(status);
        }
        return RemoteOutcome::Remote(err);
    }

    RemoteOutcome::Unclassified(render_diagnostic(&body))
}

/// Printable description of a payload that matched no known shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// JSON kind of the payload: object, array, string, number, bool or null
    pub kind: &'static str,

    /// Pretty-printed payload
    pub rendered: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} payload: {}", self.kind, self.rendered)
    }
}

/// Render a payload for error reports and logs.
///
/// Output is stable for a given value: pretty-printed with two-space
/// indentation, independent of any logging setup.
pub fn render_diagnostic(value: &Value) -> Diagnostic {
    let kind = match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());

    Diagnostic { kind, rendered }
}
