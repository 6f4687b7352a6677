//! Characteristic types, values and the characteristic handle interface

use std::fmt;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::status::HapStatus;

/// Characteristics the bridge reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacteristicType {
    Name,
    On,
    Brightness,
    PositionState,
    CurrentPosition,
    TargetPosition,
}

impl CharacteristicType {
    /// Display name as used in the HAP specification
    pub fn name(&self) -> &'static str {
        match self {
            CharacteristicType::Name => "Name",
            CharacteristicType::On => "On",
            CharacteristicType::Brightness => "Brightness",
            CharacteristicType::PositionState => "Position State",
            CharacteristicType::CurrentPosition => "Current Position",
            CharacteristicType::TargetPosition => "Target Position",
        }
    }
}

impl fmt::Display for CharacteristicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Movement indicator of a cover-like service
///
/// Discriminants are the HAP wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionState {
    Decreasing = 0,
    Increasing = 1,
    Stopped = 2,
}

/// A value held by a characteristic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CharacteristicValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl CharacteristicValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CharacteristicValue::Bool(b) => Some(*b),
            // Controllers send On as 0/1 as often as true/false
            CharacteristicValue::Int(0) => Some(false),
            CharacteristicValue::Int(1) => Some(true),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CharacteristicValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CharacteristicValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for CharacteristicValue {
    fn from(value: bool) -> Self {
        CharacteristicValue::Bool(value)
    }
}

impl From<u8> for CharacteristicValue {
    fn from(value: u8) -> Self {
        CharacteristicValue::Int(i64::from(value))
    }
}

impl From<i64> for CharacteristicValue {
    fn from(value: i64) -> Self {
        CharacteristicValue::Int(value)
    }
}

impl From<PositionState> for CharacteristicValue {
    fn from(value: PositionState) -> Self {
        CharacteristicValue::Int(value as i64)
    }
}

impl From<&str> for CharacteristicValue {
    fn from(value: &str) -> Self {
        CharacteristicValue::String(value.to_string())
    }
}

impl From<String> for CharacteristicValue {
    fn from(value: String) -> Self {
        CharacteristicValue::String(value)
    }
}

impl fmt::Display for CharacteristicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CharacteristicValue::Bool(b) => write!(f, "{}", b),
            CharacteristicValue::Int(n) => write!(f, "{}", n),
            CharacteristicValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// Handler invoked when a controller writes a characteristic
///
/// The returned future resolves once the write has been carried out (or
/// rejected). An `Err` is reported to the controller as the HAP status.
pub type SetHandler =
    Arc<dyn Fn(CharacteristicValue) -> BoxFuture<'static, Result<(), HapStatus>> + Send + Sync>;

/// Handle to a single characteristic of a service
pub trait Characteristic: Send + Sync {
    /// Type of this characteristic
    fn characteristic_type(&self) -> CharacteristicType;

    /// Last known value, if any has been set
    fn value(&self) -> Option<CharacteristicValue>;

    /// Register the handler for controller writes, replacing any previous one
    fn on_set(&self, handler: SetHandler);

    /// Push a new value to controllers without invoking the set handler
    fn update_value(&self, value: CharacteristicValue);
}
