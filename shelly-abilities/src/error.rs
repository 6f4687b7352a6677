//! Error types for shelly-abilities

use thiserror::Error;

/// Result type for ability configuration
pub type Result<T> = std::result::Result<T, AbilityError>;

/// Errors raised while configuring abilities
///
/// Runtime failures never surface as `AbilityError`: notification handlers
/// are infallible and command failures are reported to the controller as a
/// [`HapStatus`](hap_model::HapStatus).
#[derive(Error, Debug)]
pub enum AbilityError {
    /// Device options could not be decoded
    #[error("Invalid device options: {0}")]
    InvalidOptions(#[from] serde_json::Error),

    /// A cover type name that is not one of `door`, `window`, `windowCovering`
    #[error("Unknown cover type: {0}")]
    UnknownCoverKind(String),
}
