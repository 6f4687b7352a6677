//! Service and accessory interfaces
//!
//! A service groups the characteristics of one function of an accessory
//! (a window covering, a lightbulb, ...). Accessories hand out services by
//! subtype so that one physical device can expose several services of the
//! same category.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::characteristic::{Characteristic, CharacteristicType, CharacteristicValue};

/// Service categories the bridge can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    Door,
    Window,
    WindowCovering,
    Lightbulb,
}

impl ServiceType {
    pub fn name(&self) -> &'static str {
        match self {
            ServiceType::Door => "Door",
            ServiceType::Window => "Window",
            ServiceType::WindowCovering => "Window Covering",
            ServiceType::Lightbulb => "Lightbulb",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One service of an accessory
///
/// # Example
///
/// ```rust,ignore
/// service
///     .set_characteristic(CharacteristicType::CurrentPosition, 40u8.into())
///     .set_characteristic(CharacteristicType::TargetPosition, 40u8.into());
///
/// service
///     .characteristic(CharacteristicType::TargetPosition)
///     .update_value(80u8.into());
/// ```
pub trait Service: Send + Sync {
    fn service_type(&self) -> ServiceType;

    fn display_name(&self) -> &str;

    /// Subtype distinguishing services of the same type on one accessory
    fn subtype(&self) -> &str;

    /// Seed a characteristic value
    ///
    /// Does not invoke the characteristic's set handler. Returns the service
    /// so that several values can be seeded in one chain.
    fn set_characteristic(
        &self,
        characteristic: CharacteristicType,
        value: CharacteristicValue,
    ) -> &dyn Service;

    /// Get (or create) the handle for a characteristic
    fn characteristic(&self, characteristic: CharacteristicType) -> Arc<dyn Characteristic>;
}

/// An accessory that owns services
pub trait Accessory: Send + Sync {
    /// Get the service with `subtype`, adding it if the accessory lacks one
    fn service(&self, service_type: ServiceType, name: &str, subtype: &str) -> Arc<dyn Service>;
}
