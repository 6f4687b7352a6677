//! Test doubles for component transports
//!
//! Enabled with the `test-support` feature.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::component::RpcTransport;
use crate::error::{ComponentError, Result};

/// One call captured by [`RecordingTransport`]
#[derive(Debug, Clone, PartialEq)]
pub struct RpcCall {
    pub method: String,
    pub params: Value,
}

/// Transport that records calls instead of talking to a device
///
/// Succeeds with `null` unless [`fail_with`](Self::fail_with) was called.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RpcCall>>,
    failure: Mutex<Option<String>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every following call fail with an RPC error carrying `message`
    pub fn fail_with(&self, message: impl Into<String>) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(message.into());
        }
    }

    /// Make every following call succeed again
    pub fn succeed(&self) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = None;
        }
    }

    pub fn calls(&self) -> Vec<RpcCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }
}

#[async_trait]
impl RpcTransport for RecordingTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RpcCall {
                method: method.to_string(),
                params,
            });
        }

        let failure = self.failure.lock().ok().and_then(|f| f.clone());
        match failure {
            Some(message) => Err(ComponentError::Rpc {
                method: method.to_string(),
                code: -103,
                message,
            }),
            None => Ok(Value::Null),
        }
    }
}
