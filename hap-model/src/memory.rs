//! In-memory accessory model
//!
//! A complete, dependency-free implementation of the accessory interfaces.
//! Every pushed value is recorded so callers can inspect exactly what a
//! controller would have been told, and [`MemoryCharacteristic::write`]
//! plays the part of a controller writing a characteristic.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::characteristic::{Characteristic, CharacteristicType, CharacteristicValue, SetHandler};
use crate::service::{Accessory, Service, ServiceType};
use crate::status::HapStatus;

// ============================================================================
// MemoryCharacteristic
// ============================================================================

pub struct MemoryCharacteristic {
    characteristic_type: CharacteristicType,
    value: RwLock<Option<CharacteristicValue>>,
    handler: RwLock<Option<SetHandler>>,
    pushes: RwLock<Vec<CharacteristicValue>>,
}

impl MemoryCharacteristic {
    pub fn new(characteristic_type: CharacteristicType) -> Self {
        Self {
            characteristic_type,
            value: RwLock::new(None),
            handler: RwLock::new(None),
            pushes: RwLock::new(Vec::new()),
        }
    }

    /// Values pushed through `update_value`, oldest first
    pub fn pushes(&self) -> Vec<CharacteristicValue> {
        self.pushes.read().clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.read().len()
    }

    pub fn has_set_handler(&self) -> bool {
        self.handler.read().is_some()
    }

    /// Write a value as a controller would
    ///
    /// Runs the set handler and stores the value once the handler succeeds.
    /// On failure the previous value is kept and the handler's status is
    /// returned.
    pub async fn write(&self, value: CharacteristicValue) -> Result<(), HapStatus> {
        let handler = self
            .handler
            .read()
            .clone()
            .ok_or(HapStatus::ReadOnlyCharacteristic)?;

        tracing::trace!(
            characteristic = %self.characteristic_type,
            value = %value,
            "controller write"
        );
        handler(value.clone()).await?;

        *self.value.write() = Some(value);
        Ok(())
    }
}

impl Characteristic for MemoryCharacteristic {
    fn characteristic_type(&self) -> CharacteristicType {
        self.characteristic_type
    }

    fn value(&self) -> Option<CharacteristicValue> {
        self.value.read().clone()
    }

    fn on_set(&self, handler: SetHandler) {
        *self.handler.write() = Some(handler);
    }

    fn update_value(&self, value: CharacteristicValue) {
        *self.value.write() = Some(value.clone());
        self.pushes.write().push(value);
    }
}

impl std::fmt::Debug for MemoryCharacteristic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCharacteristic")
            .field("type", &self.characteristic_type)
            .field("value", &*self.value.read())
            .field("push_count", &self.push_count())
            .finish()
    }
}

// ============================================================================
// MemoryService
// ============================================================================

#[derive(Debug)]
pub struct MemoryService {
    service_type: ServiceType,
    display_name: String,
    subtype: String,
    characteristics: RwLock<HashMap<CharacteristicType, Arc<MemoryCharacteristic>>>,
}

impl MemoryService {
    pub fn new(service_type: ServiceType, display_name: &str, subtype: &str) -> Self {
        Self {
            service_type,
            display_name: display_name.to_string(),
            subtype: subtype.to_string(),
            characteristics: RwLock::new(HashMap::new()),
        }
    }

    /// Concrete handle for a characteristic, created on first access
    pub fn memory_characteristic(
        &self,
        characteristic: CharacteristicType,
    ) -> Arc<MemoryCharacteristic> {
        if let Some(existing) = self.characteristics.read().get(&characteristic) {
            return Arc::clone(existing);
        }

        let mut characteristics = self.characteristics.write();
        Arc::clone(
            characteristics
                .entry(characteristic)
                .or_insert_with(|| Arc::new(MemoryCharacteristic::new(characteristic))),
        )
    }

    /// Current value of a characteristic, `None` if it was never set
    pub fn value(&self, characteristic: CharacteristicType) -> Option<CharacteristicValue> {
        self.characteristics
            .read()
            .get(&characteristic)
            .and_then(|c| c.value())
    }

    /// Number of `update_value` pushes across all characteristics
    pub fn total_pushes(&self) -> usize {
        self.characteristics
            .read()
            .values()
            .map(|c| c.push_count())
            .sum()
    }

    /// Write a characteristic as a controller would
    pub async fn write(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> Result<(), HapStatus> {
        self.memory_characteristic(characteristic).write(value).await
    }
}

impl Service for MemoryService {
    fn service_type(&self) -> ServiceType {
        self.service_type
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn subtype(&self) -> &str {
        &self.subtype
    }

    fn set_characteristic(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> &dyn Service {
        let handle = self.memory_characteristic(characteristic);
        *handle.value.write() = Some(value);
        self
    }

    fn characteristic(&self, characteristic: CharacteristicType) -> Arc<dyn Characteristic> {
        self.memory_characteristic(characteristic)
    }
}

// ============================================================================
// MemoryAccessory
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryAccessory {
    services: RwLock<Vec<Arc<MemoryService>>>,
}

impl MemoryAccessory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concrete service registered under `subtype`
    pub fn memory_service(&self, subtype: &str) -> Option<Arc<MemoryService>> {
        self.services
            .read()
            .iter()
            .find(|s| s.subtype == subtype)
            .cloned()
    }

    pub fn service_count(&self) -> usize {
        self.services.read().len()
    }
}

impl Accessory for MemoryAccessory {
    fn service(&self, service_type: ServiceType, name: &str, subtype: &str) -> Arc<dyn Service> {
        let mut services = self.services.write();

        if let Some(existing) = services
            .iter()
            .find(|s| s.service_type == service_type && s.subtype == subtype)
        {
            return Arc::clone(existing) as Arc<dyn Service>;
        }

        let service = Arc::new(MemoryService::new(service_type, name, subtype));
        services.push(Arc::clone(&service));
        service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_set_characteristic_seeds_without_push() {
        let service = MemoryService::new(ServiceType::Window, "Window 1", "window-0");

        service
            .set_characteristic(CharacteristicType::CurrentPosition, 40u8.into())
            .set_characteristic(CharacteristicType::TargetPosition, 40u8.into());

        assert_eq!(
            service.value(CharacteristicType::CurrentPosition),
            Some(CharacteristicValue::Int(40))
        );
        assert_eq!(service.total_pushes(), 0);
    }

    #[test]
    fn test_update_value_records_push() {
        let service = MemoryService::new(ServiceType::Window, "Window 1", "window-0");
        let target = service.characteristic(CharacteristicType::TargetPosition);

        target.update_value(10u8.into());
        target.update_value(20u8.into());

        let handle = service.memory_characteristic(CharacteristicType::TargetPosition);
        assert_eq!(
            handle.pushes(),
            vec![CharacteristicValue::Int(10), CharacteristicValue::Int(20)]
        );
        assert_eq!(target.value(), Some(CharacteristicValue::Int(20)));
    }

    #[tokio::test]
    async fn test_write_without_handler_is_read_only() {
        let service = MemoryService::new(ServiceType::Lightbulb, "Light 1", "light-0");
        let result = service
            .write(CharacteristicType::On, CharacteristicValue::Bool(true))
            .await;
        assert_eq!(result, Err(HapStatus::ReadOnlyCharacteristic));
    }

    #[tokio::test]
    async fn test_write_stores_value_only_on_success() {
        let service = MemoryService::new(ServiceType::Window, "Window 1", "window-0");
        let target = service.characteristic(CharacteristicType::TargetPosition);
        target.on_set(Arc::new(|value: CharacteristicValue| {
            async move {
                match value.as_i64() {
                    Some(n) if n <= 100 => Ok(()),
                    _ => Err(HapStatus::InvalidValueInRequest),
                }
            }
            .boxed()
        }));

        service
            .write(CharacteristicType::TargetPosition, 80u8.into())
            .await
            .unwrap();
        assert_eq!(target.value(), Some(CharacteristicValue::Int(80)));

        let rejected = service
            .write(CharacteristicType::TargetPosition, CharacteristicValue::Int(150))
            .await;
        assert_eq!(rejected, Err(HapStatus::InvalidValueInRequest));
        assert_eq!(target.value(), Some(CharacteristicValue::Int(80)));
    }

    #[test]
    fn test_accessory_reuses_service_by_subtype() {
        let accessory = MemoryAccessory::new();
        let first = accessory.service(ServiceType::Window, "Window 1", "window-0");
        let again = accessory.service(ServiceType::Window, "Window 1", "window-0");
        let other = accessory.service(ServiceType::Window, "Window 2", "window-1");

        assert_eq!(first.subtype(), again.subtype());
        assert_eq!(other.display_name(), "Window 2");
        assert_eq!(accessory.service_count(), 2);
        assert!(accessory.memory_service("window-1").is_some());
    }
}
