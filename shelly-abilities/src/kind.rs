//! Service flavours a cover can be published as

use std::fmt;
use std::str::FromStr;

use hap_model::ServiceType;
use serde::{Deserialize, Serialize};
use shelly_device::ComponentId;

use crate::error::AbilityError;

/// How a cover is presented to HomeKit
///
/// Serialized with the same names users put in their configuration
/// (`door`, `window`, `windowCovering`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CoverKind {
    Door,
    #[default]
    Window,
    WindowCovering,
}

impl CoverKind {
    pub const ALL: [CoverKind; 3] = [CoverKind::Door, CoverKind::Window, CoverKind::WindowCovering];

    /// Human readable label used in service names
    pub fn label(&self) -> &'static str {
        match self {
            CoverKind::Door => "Door",
            CoverKind::Window => "Window",
            CoverKind::WindowCovering => "Window Covering",
        }
    }

    /// Identifier used in service subtypes and configuration
    pub fn slug(&self) -> &'static str {
        match self {
            CoverKind::Door => "door",
            CoverKind::Window => "window",
            CoverKind::WindowCovering => "windowCovering",
        }
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            CoverKind::Door => ServiceType::Door,
            CoverKind::Window => ServiceType::Window,
            CoverKind::WindowCovering => ServiceType::WindowCovering,
        }
    }

    /// Service name for the cover with `id`, e.g. `"Window Covering 2"`
    pub fn instance_name(&self, id: ComponentId) -> String {
        format!("{} {}", self.label(), id.index())
    }

    /// Instance key (service subtype) for the cover with `id`, e.g. `"windowCovering-1"`
    pub fn instance_key(&self, id: ComponentId) -> String {
        format!("{}-{}", self.slug(), id)
    }
}

impl fmt::Display for CoverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CoverKind {
    type Err = AbilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CoverKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AbilityError::UnknownCoverKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CoverKind::Door, 0, "Door 1", "door-0")]
    #[case(CoverKind::Window, 0, "Window 1", "window-0")]
    #[case(CoverKind::WindowCovering, 1, "Window Covering 2", "windowCovering-1")]
    fn test_names(
        #[case] kind: CoverKind,
        #[case] id: u8,
        #[case] name: &str,
        #[case] key: &str,
    ) {
        let id = ComponentId::new(id);
        assert_eq!(kind.instance_name(id), name);
        assert_eq!(kind.instance_key(id), key);
    }

    #[test]
    fn test_default_is_window() {
        assert_eq!(CoverKind::default(), CoverKind::Window);
    }

    #[test]
    fn test_parse() {
        assert_eq!("windowCovering".parse::<CoverKind>().unwrap(), CoverKind::WindowCovering);
        assert_eq!("Door".parse::<CoverKind>().unwrap(), CoverKind::Door);
        assert!(matches!(
            "garage".parse::<CoverKind>(),
            Err(AbilityError::UnknownCoverKind(_))
        ));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&CoverKind::WindowCovering).unwrap(),
            "\"windowCovering\""
        );
        let kind: CoverKind = serde_json::from_str("\"door\"").unwrap();
        assert_eq!(kind, CoverKind::Door);
    }
}
