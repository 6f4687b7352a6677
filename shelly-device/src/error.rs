use thiserror::Error;

/// Errors raised by component actions and status decoding
#[derive(Error, Debug)]
pub enum ComponentError {
    /// The device answered the RPC call with an error
    #[error("{method} failed with code {code}: {message}")]
    Rpc {
        method: String,
        code: i32,
        message: String,
    },

    /// The call never reached the device or its answer was lost
    #[error("Transport error: {0}")]
    Transport(String),

    /// A status notification could not be decoded
    #[error("Invalid status payload: {0}")]
    InvalidStatus(#[from] serde_json::Error),

    /// An action argument is outside its valid range
    #[error("{field} {value} is outside 0-100")]
    OutOfRange { field: &'static str, value: u8 },
}

/// Result type for component operations
pub type Result<T> = std::result::Result<T, ComponentError>;
