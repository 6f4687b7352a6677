//! HAP status codes returned from characteristic write handlers

use thiserror::Error;

/// Status a characteristic write handler reports back to the controller
///
/// The numeric values are the HomeKit Accessory Protocol status codes.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HapStatus {
    #[error("Service communication failure")]
    ServiceCommunicationFailure,

    #[error("Characteristic is read-only")]
    ReadOnlyCharacteristic,

    #[error("Invalid value in request")]
    InvalidValueInRequest,
}

impl HapStatus {
    /// HAP status code sent to the controller
    pub fn code(&self) -> i32 {
        match self {
            HapStatus::ServiceCommunicationFailure => -70402,
            HapStatus::ReadOnlyCharacteristic => -70404,
            HapStatus::InvalidValueInRequest => -70410,
        }
    }
}
