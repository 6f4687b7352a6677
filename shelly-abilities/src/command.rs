//! Translation of HomeKit writes into component actions

use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hap_model::{CharacteristicValue, HapStatus};
use shelly_device::ComponentError;
use tracing::{debug, error, warn};

use crate::projection::POSITION_MAX;

/// What happened to an accepted command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The requested value was already the component's value
    Skipped,
    /// The component action completed successfully
    Applied,
}

/// Runs component actions on behalf of one ability
///
/// The translator never pushes characteristic values. The component reports
/// its progress through change notifications, which the ability projects.
#[derive(Debug, Clone)]
pub struct CommandTranslator {
    ability: String,
    attached: Arc<AtomicBool>,
}

impl CommandTranslator {
    /// Create a translator that accepts commands while `attached` is set
    pub fn new(ability: impl Into<String>, attached: Arc<AtomicBool>) -> Self {
        Self {
            ability: ability.into(),
            attached,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    /// Run `action` unless `requested` equals `current`
    ///
    /// Action failures are logged and reported as
    /// [`HapStatus::ServiceCommunicationFailure`].
    pub async fn execute<T, F, Fut>(
        &self,
        command: &'static str,
        requested: T,
        current: Option<T>,
        action: F,
    ) -> Result<CommandOutcome, HapStatus>
    where
        T: PartialEq + Copy + fmt::Debug,
        F: FnOnce(T) -> Fut,
        Fut: Future<Output = Result<(), ComponentError>>,
    {
        if !self.is_attached() {
            warn!(ability = %self.ability, command, ?requested, "command rejected, ability is detached");
            return Err(HapStatus::ServiceCommunicationFailure);
        }

        if current == Some(requested) {
            debug!(ability = %self.ability, command, ?requested, "value unchanged, skipping");
            return Ok(CommandOutcome::Skipped);
        }

        let result = action(requested).await;

        if !self.is_attached() {
            debug!(
                ability = %self.ability,
                command,
                ?requested,
                success = result.is_ok(),
                "command completed after detach"
            );
        }

        match result {
            Ok(()) => Ok(CommandOutcome::Applied),
            Err(e) => {
                error!(ability = %self.ability, command, ?requested, error = %e, "Failed to set {}", command);
                Err(HapStatus::ServiceCommunicationFailure)
            }
        }
    }
}

/// Decode a written position (0-100)
pub fn position_from_value(value: &CharacteristicValue) -> Result<u8, HapStatus> {
    value
        .as_i64()
        .and_then(|n| u8::try_from(n).ok())
        .filter(|pos| *pos <= POSITION_MAX)
        .ok_or(HapStatus::InvalidValueInRequest)
}

/// Decode a written on/off value
pub fn bool_from_value(value: &CharacteristicValue) -> Result<bool, HapStatus> {
    value.as_bool().ok_or(HapStatus::InvalidValueInRequest)
}
