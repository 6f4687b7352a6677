//! Traits shared by every component kind

use std::fmt;

use async_trait::async_trait;
use attribute_store::{ChangeHandler, ListenerId};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Numeric id of a component within its device (`cover:0`, `light:1`, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(u8);

impl ComponentId {
    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// 1-based index used in human-readable names
    pub fn index(&self) -> u16 {
        u16::from(self.0) + 1
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for ComponentId {
    fn from(id: u8) -> Self {
        ComponentId::new(id)
    }
}

/// A live sub-unit of a device
///
/// Change notifications are keyed by attribute name (`"state"`,
/// `"current_pos"`, ...). Listeners are invoked synchronously, after the
/// new value is readable, and only when the value actually changed.
pub trait Component: Send + Sync {
    fn id(&self) -> ComponentId;

    /// Register a change listener for `attribute`
    fn on(&self, attribute: &'static str, handler: ChangeHandler) -> ListenerId;

    /// Remove a listener previously registered with [`on`](Self::on)
    fn off(&self, attribute: &'static str, listener: ListenerId) -> bool;
}

/// Sends RPC requests to a device
///
/// Implementations own the connection (WebSocket, HTTP, ...). A successful
/// call means the device accepted the request, not that the physical
/// action has completed.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    async fn call(&self, method: &str, params: Value) -> Result<Value>;
}
