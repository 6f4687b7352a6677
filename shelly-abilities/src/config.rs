//! Per-device ability options
//!
//! Options are read from the plugin configuration, keyed by component id:
//!
//! ```json
//! {
//!   "covers": { "0": { "type": "windowCovering" }, "1": { "active": false } },
//!   "lights": { "0": { "active": true } }
//! }
//! ```
//!
//! Components without an entry use the defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use shelly_device::ComponentId;

use crate::error::Result;
use crate::kind::CoverKind;

fn default_active() -> bool {
    true
}

/// Options for one cover component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverOptions {
    /// Service flavour to publish
    #[serde(rename = "type", default)]
    pub kind: CoverKind,

    /// Set to `false` to leave the cover out of HomeKit
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Default for CoverOptions {
    fn default() -> Self {
        Self {
            kind: CoverKind::default(),
            active: true,
        }
    }
}

impl CoverOptions {
    pub fn with_kind(kind: CoverKind) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }
}

/// Options for one light component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightOptions {
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Default for LightOptions {
    fn default() -> Self {
        Self { active: true }
    }
}

/// Options for all components of a device
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceOptions {
    #[serde(default)]
    pub covers: HashMap<u8, CoverOptions>,

    #[serde(default)]
    pub lights: HashMap<u8, LightOptions>,
}

impl DeviceOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn cover(&self, id: ComponentId) -> CoverOptions {
        self.covers.get(&id.value()).copied().unwrap_or_default()
    }

    pub fn light(&self, id: ComponentId) -> LightOptions {
        self.lights.get(&id.value()).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AbilityError;

    #[test]
    fn test_from_json() {
        let options = DeviceOptions::from_json(
            r#"{
                "covers": { "0": { "type": "windowCovering" }, "1": { "active": false } },
                "lights": { "0": {} }
            }"#,
        )
        .unwrap();

        assert_eq!(
            options.cover(ComponentId::new(0)),
            CoverOptions::with_kind(CoverKind::WindowCovering)
        );
        assert_eq!(
            options.cover(ComponentId::new(1)),
            CoverOptions {
                kind: CoverKind::Window,
                active: false
            }
        );
        assert!(options.light(ComponentId::new(0)).active);
    }

    #[test]
    fn test_missing_entries_use_defaults() {
        let options = DeviceOptions::from_json("{}").unwrap();
        assert_eq!(options.cover(ComponentId::new(3)), CoverOptions::default());
        assert_eq!(options.light(ComponentId::new(3)), LightOptions::default());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let result = DeviceOptions::from_json(r#"{"covers": {"0": {"type": "garage"}}}"#);
        assert!(matches!(result, Err(AbilityError::InvalidOptions(_))));
    }
}
