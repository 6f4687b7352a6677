//! Shelly Abilities
//!
//! Keeps HomeKit services in sync with Shelly device components, in both
//! directions:
//!
//! ```text
//! Cover attribute changes ─→ CoverAbility ─→ CoverProjection ─→ Service::update_value (all three values)
//!
//! controller writes Target Position ─→ CommandTranslator ─→ CoverComponent::go_to_position
//! ```
//!
//! The device is the single source of truth. Commands never push values;
//! the component's own change notifications drive every update.
//!
//! # Example
//!
//! ```rust,ignore
//! use shelly_abilities::prelude::*;
//!
//! let options = DeviceOptions::from_json(&config)?;
//! let cover = Arc::new(Cover::new(0, transport));
//!
//! if let Some(mut ability) = CoverAbility::from_options(cover.clone(), &options.cover(cover.id())) {
//!     ability.setup(&accessory);
//! }
//! ```

pub mod ability;
pub mod command;
pub mod config;
pub mod cover;
pub mod error;
pub mod kind;
pub mod light;
pub mod logging;
pub mod projection;

pub use ability::{Ability, AbilityCore, Subscriptions};
pub use command::{bool_from_value, position_from_value, CommandOutcome, CommandTranslator};
pub use config::{CoverOptions, DeviceOptions, LightOptions};
pub use cover::CoverAbility;
pub use error::{AbilityError, Result};
pub use kind::CoverKind;
pub use light::LightAbility;
pub use logging::{init_logging, init_logging_from_env, LoggingError, LoggingMode};
pub use projection::{CoverProjection, LightProjection};

/// Convenient imports for bridge plugins
pub mod prelude {
    pub use crate::{
        Ability, CoverAbility, CoverKind, CoverOptions, DeviceOptions, LightAbility, LightOptions,
    };
    pub use hap_model::{Accessory, HapStatus, Service, ServiceType};
    pub use shelly_device::{Component, Cover, CoverComponent, Light, LightComponent};
}
