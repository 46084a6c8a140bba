//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use deploy_client::{CallEndpoint, ClientError, DeploymentDefinition, RawResponse, TransportError};
use serde_json::{json, Value};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Endpoint replaying a fixed script of results, then repeating a fallback
pub struct ScriptedEndpoint {
    script: Mutex<VecDeque<Result<RawResponse, ClientError>>>,
    fallback: Result<RawResponse, ClientError>,
    calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
}

impl ScriptedEndpoint {
    pub fn new(
        script: Vec<Result<RawResponse, ClientError>>,
        fallback: Result<RawResponse, ClientError>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
        })
    }

    pub fn always(result: Result<RawResponse, ClientError>) -> Arc<Self> {
        Self::new(Vec::new(), result)
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallEndpoint for ScriptedEndpoint {
    async fn invoke(
        &self,
        _ctx: &CancellationToken,
        _request: &DeploymentDefinition,
    ) -> Result<RawResponse, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.call_times.lock().unwrap().push(Instant::now());

        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }
}

pub fn ok(body: Value) -> Result<RawResponse, ClientError> {
    Ok(RawResponse { status: 200, body })
}

pub fn ready(id: &str) -> Result<RawResponse, ClientError> {
    ok(json!({"id": id, "status": "ready"}))
}

pub fn refused() -> Result<RawResponse, ClientError> {
    Err(ClientError::Transport(TransportError::Connect(
        "connection refused".to_string(),
    )))
}

pub fn request() -> DeploymentDefinition {
    DeploymentDefinition::new("d1", "pending")
}
