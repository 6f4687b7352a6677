//! HomeKit accessory model
//!
//! The interfaces the bridge uses to publish device state to HomeKit
//! controllers and to receive their commands:
//!
//! - [`Accessory`] hands out [`Service`]s by subtype
//! - [`Service`] seeds characteristic values and hands out [`Characteristic`] handles
//! - [`Characteristic`] pushes values (`update_value`) and accepts a write
//!   handler (`on_set`) whose failures are reported as a [`HapStatus`]
//!
//! The [`memory`] module contains an in-memory implementation of all three
//! that records every pushed value.
//!
//! # Example
//!
//! ```rust
//! use hap_model::{Accessory, CharacteristicType, MemoryAccessory, PositionState, ServiceType};
//!
//! let accessory = MemoryAccessory::new();
//! let service = accessory.service(ServiceType::WindowCovering, "Window Covering 1", "windowCovering-0");
//!
//! service
//!     .set_characteristic(CharacteristicType::PositionState, PositionState::Stopped.into())
//!     .set_characteristic(CharacteristicType::CurrentPosition, 40u8.into());
//!
//! service
//!     .characteristic(CharacteristicType::CurrentPosition)
//!     .update_value(55u8.into());
//! ```

pub mod characteristic;
pub mod memory;
pub mod service;
pub mod status;

pub use characteristic::{
    Characteristic, CharacteristicType, CharacteristicValue, PositionState, SetHandler,
};
pub use memory::{MemoryAccessory, MemoryCharacteristic, MemoryService};
pub use service::{Accessory, Service, ServiceType};
pub use status::HapStatus;
