//! Partial status updates reported by the device
//!
//! Shelly Gen2 devices report component state in `NotifyStatus`
//! notifications that only carry the fields that changed:
//!
//! ```json
//! {"method": "NotifyStatus", "params": {"cover:0": {"id": 0, "current_pos": 55}}}
//! ```
//!
//! A missing field leaves the attribute untouched, while an explicit `null`
//! clears it (an uncalibrated cover reports `"current_pos": null`).

use serde::{Deserialize, Deserializer};

/// Distinguishes an absent field (`None`) from an explicit null (`Some(None)`)
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Changed fields of a cover component
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CoverStatus {
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default, deserialize_with = "explicit_null")]
    pub current_pos: Option<Option<u8>>,

    #[serde(default, deserialize_with = "explicit_null")]
    pub target_pos: Option<Option<u8>>,

    #[serde(default)]
    pub pos_control: Option<bool>,
}

impl CoverStatus {
    pub fn state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Default::default()
        }
    }

    pub fn current_pos(pos: u8) -> Self {
        Self {
            current_pos: Some(Some(pos)),
            ..Default::default()
        }
    }

    pub fn target_pos(pos: u8) -> Self {
        Self {
            target_pos: Some(Some(pos)),
            ..Default::default()
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }

    pub fn with_current_pos(mut self, pos: Option<u8>) -> Self {
        self.current_pos = Some(pos);
        self
    }

    pub fn with_target_pos(mut self, pos: Option<u8>) -> Self {
        self.target_pos = Some(pos);
        self
    }

    pub fn with_pos_control(mut self, enabled: bool) -> Self {
        self.pos_control = Some(enabled);
        self
    }
}

/// Changed fields of a light (dimmer) component
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LightStatus {
    #[serde(default)]
    pub output: Option<bool>,

    #[serde(default)]
    pub brightness: Option<u8>,
}

impl LightStatus {
    pub fn output(on: bool) -> Self {
        Self {
            output: Some(on),
            ..Default::default()
        }
    }

    pub fn brightness(level: u8) -> Self {
        Self {
            brightness: Some(level),
            ..Default::default()
        }
    }

    pub fn with_brightness(mut self, level: u8) -> Self {
        self.brightness = Some(level);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_and_null_are_distinct() {
        let status: CoverStatus =
            serde_json::from_value(json!({"id": 0, "current_pos": null})).unwrap();

        assert_eq!(status.current_pos, Some(None));
        assert_eq!(status.target_pos, None);
        assert_eq!(status.state, None);
    }

    #[test]
    fn test_full_cover_status() {
        let status: CoverStatus = serde_json::from_value(json!({
            "id": 1,
            "source": "WS_in",
            "state": "opening",
            "current_pos": 40,
            "target_pos": 80,
            "pos_control": true
        }))
        .unwrap();

        assert_eq!(
            status,
            CoverStatus::state("opening")
                .with_current_pos(Some(40))
                .with_target_pos(Some(80))
                .with_pos_control(true)
        );
    }

    #[test]
    fn test_light_status() {
        let status: LightStatus =
            serde_json::from_value(json!({"id": 0, "output": true, "brightness": 35})).unwrap();
        assert_eq!(status, LightStatus::output(true).with_brightness(35));
    }

    #[test]
    fn test_rejects_wrong_types() {
        let result = serde_json::from_value::<CoverStatus>(json!({"current_pos": "high"}));
        assert!(result.is_err());
    }
}
