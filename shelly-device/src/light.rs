//! Light component (dimmer channels)

use std::sync::Arc;

use async_trait::async_trait;
use attribute_store::{Attribute, AttributeStore, ChangeHandler, ListenerId};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::component::{Component, ComponentId, RpcTransport};
use crate::error::{ComponentError, Result};
use crate::status::LightStatus;

/// Whether the output is switched on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output(pub bool);

impl Attribute for Output {
    const KEY: &'static str = "output";
}

/// Brightness level (0-100)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brightness(pub Option<u8>);

impl Attribute for Brightness {
    const KEY: &'static str = "brightness";
}

/// Read access, change notifications and actions of a dimmable light
#[async_trait]
pub trait LightComponent: Component {
    fn output(&self) -> bool;

    fn brightness(&self) -> Option<u8>;

    async fn set_output(&self, on: bool) -> Result<()>;

    async fn set_brightness(&self, level: u8) -> Result<()>;
}

/// A light component of a Shelly dimmer
pub struct Light {
    id: ComponentId,
    attributes: AttributeStore,
    transport: Arc<dyn RpcTransport>,
}

impl Light {
    pub fn new(id: u8, transport: Arc<dyn RpcTransport>) -> Self {
        let attributes = AttributeStore::new();
        attributes.set(Output(false));
        attributes.set(Brightness(None));

        Self {
            id: ComponentId::new(id),
            attributes,
            transport,
        }
    }

    pub fn with_status(id: u8, transport: Arc<dyn RpcTransport>, status: LightStatus) -> Self {
        let light = Self::new(id, transport);
        light.update(status);
        light
    }

    /// Apply a partial status update, `output` before `brightness`
    pub fn update(&self, status: LightStatus) {
        if let Some(on) = status.output {
            self.attributes.set(Output(on));
        }
        if let Some(level) = status.brightness {
            self.attributes.set(Brightness(Some(level)));
        }
    }

    /// Decode and apply the component object of a `NotifyStatus` notification
    pub fn apply_status(&self, status: &Value) -> Result<()> {
        let status = LightStatus::deserialize(status)?;
        debug!(component = %self.id, ?status, "light status");
        self.update(status);
        Ok(())
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }

    async fn set(&self, params: Value) -> Result<()> {
        debug!(component = %self.id, %params, "Light.Set");
        self.transport.call("Light.Set", params).await?;
        Ok(())
    }
}

impl Component for Light {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn on(&self, attribute: &'static str, handler: ChangeHandler) -> ListenerId {
        self.attributes.on(attribute, handler)
    }

    fn off(&self, attribute: &'static str, listener: ListenerId) -> bool {
        self.attributes.off(attribute, listener)
    }
}

#[async_trait]
impl LightComponent for Light {
    fn output(&self) -> bool {
        self.attributes.get::<Output>().map(|o| o.0).unwrap_or(false)
    }

    fn brightness(&self) -> Option<u8> {
        self.attributes.get::<Brightness>().and_then(|b| b.0)
    }

    async fn set_output(&self, on: bool) -> Result<()> {
        self.set(json!({ "id": self.id.value(), "on": on })).await
    }

    async fn set_brightness(&self, level: u8) -> Result<()> {
        if level > 100 {
            return Err(ComponentError::OutOfRange {
                field: "brightness",
                value: level,
            });
        }
        self.set(json!({ "id": self.id.value(), "brightness": level }))
            .await
    }
}

impl std::fmt::Debug for Light {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Light")
            .field("id", &self.id)
            .field("output", &self.output())
            .field("brightness", &self.brightness())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    #[test]
    fn test_apply_status() {
        let light = Light::new(0, RecordingTransport::new());
        light
            .apply_status(&json!({"id": 0, "output": true, "brightness": 60}))
            .unwrap();

        assert!(light.output());
        assert_eq!(light.brightness(), Some(60));
    }

    #[tokio::test]
    async fn test_set_output_and_brightness() {
        let transport = RecordingTransport::new();
        let light = Light::new(0, transport.clone());

        light.set_output(true).await.unwrap();
        light.set_brightness(25).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].method, "Light.Set");
        assert_eq!(calls[0].params, json!({"id": 0, "on": true}));
        assert_eq!(calls[1].params, json!({"id": 0, "brightness": 25}));
    }

    #[tokio::test]
    async fn test_set_brightness_validates_range() {
        let transport = RecordingTransport::new();
        let light = Light::new(0, transport.clone());

        assert!(light.set_brightness(150).await.is_err());
        assert_eq!(transport.call_count(), 0);
    }
}
