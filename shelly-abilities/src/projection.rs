//! Projection of component attributes onto HomeKit values
//!
//! Device attributes may be absent (an uncalibrated cover has no position)
//! while HomeKit values never are. Every function here is total: absent
//! values resolve to a default and positions are clamped to 0-100.

use hap_model::PositionState;
use shelly_device::{CoverComponent, CoverState, LightComponent};

/// Position reported while the device has no measurement
pub const POSITION_BASELINE: u8 = 0;

/// Highest valid position and brightness
pub const POSITION_MAX: u8 = 100;

/// Movement indicator for a raw cover state
///
/// `opening` and `closing` map to increasing and decreasing; every other
/// state (including unknown ones) is stopped.
pub fn movement(state: &str) -> PositionState {
    match CoverState::from_raw(state) {
        CoverState::Opening => PositionState::Increasing,
        CoverState::Closing => PositionState::Decreasing,
        _ => PositionState::Stopped,
    }
}

pub fn current_position(current: Option<u8>) -> u8 {
    current.unwrap_or(POSITION_BASELINE).min(POSITION_MAX)
}

/// Target position, falling back to the current position when no move is pending
pub fn target_position(target: Option<u8>, current: Option<u8>) -> u8 {
    match target {
        Some(target) => target.min(POSITION_MAX),
        None => current_position(current),
    }
}

/// The three values a cover service shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverProjection {
    pub position_state: PositionState,
    pub current_position: u8,
    pub target_position: u8,
}

impl CoverProjection {
    pub fn project(state: &str, current: Option<u8>, target: Option<u8>) -> Self {
        Self {
            position_state: movement(state),
            current_position: current_position(current),
            target_position: target_position(target, current),
        }
    }

    /// Project the current attributes of `cover`
    pub fn of<C: CoverComponent + ?Sized>(cover: &C) -> Self {
        Self::project(&cover.state(), cover.current_pos(), cover.target_pos())
    }
}

/// The values a lightbulb service shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightProjection {
    pub on: bool,
    pub brightness: u8,
}

impl LightProjection {
    pub fn project(output: bool, brightness: Option<u8>) -> Self {
        Self {
            on: output,
            brightness: brightness.unwrap_or(POSITION_BASELINE).min(POSITION_MAX),
        }
    }

    pub fn of<L: LightComponent + ?Sized>(light: &L) -> Self {
        Self::project(light.output(), light.brightness())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("opening", PositionState::Increasing)]
    #[case("closing", PositionState::Decreasing)]
    #[case("idle", PositionState::Stopped)]
    #[case("stopped", PositionState::Stopped)]
    #[case("open", PositionState::Stopped)]
    #[case("closed", PositionState::Stopped)]
    #[case("calibrating", PositionState::Stopped)]
    #[case("", PositionState::Stopped)]
    fn test_movement(#[case] state: &str, #[case] expected: PositionState) {
        assert_eq!(movement(state), expected);
    }

    #[rstest]
    #[case(None, None, 0, 0)]
    #[case(Some(40), None, 40, 40)]
    #[case(Some(40), Some(80), 40, 80)]
    #[case(None, Some(80), 0, 80)]
    #[case(Some(140), None, 100, 100)]
    #[case(Some(10), Some(255), 10, 100)]
    fn test_positions(
        #[case] current: Option<u8>,
        #[case] target: Option<u8>,
        #[case] expected_current: u8,
        #[case] expected_target: u8,
    ) {
        let projection = CoverProjection::project("idle", current, target);
        assert_eq!(projection.current_position, expected_current);
        assert_eq!(projection.target_position, expected_target);
    }

    #[test]
    fn test_light_projection() {
        assert_eq!(
            LightProjection::project(true, None),
            LightProjection {
                on: true,
                brightness: 0
            }
        );
        assert_eq!(LightProjection::project(false, Some(180)).brightness, 100);
    }
}
