//! Change notifications for attribute updates
//!
//! When an attribute changes, every listener registered for its key
//! receives a `ChangeEvent`.

use std::time::Instant;

/// A change notification emitted when an attribute value changes
///
/// Events only carry the attribute key, not the value. Listeners read
/// the current value back from the component, so a late listener always
/// observes the latest state rather than the payload of the event that
/// woke it up.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    /// The attribute key that changed (matches `Attribute::KEY`)
    pub attribute_key: &'static str,

    /// When the change was applied
    pub timestamp: Instant,
}

impl ChangeEvent {
    /// Create a new change event stamped with the current time
    pub fn new(attribute_key: &'static str) -> Self {
        Self {
            attribute_key,
            timestamp: Instant::now(),
        }
    }
}

impl PartialEq for ChangeEvent {
    fn eq(&self, other: &Self) -> bool {
        // Timestamp not included in equality
        self.attribute_key == other.attribute_key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_equality_ignores_timestamp() {
        let first = ChangeEvent::new("state");
        std::thread::sleep(std::time::Duration::from_millis(1));
        let second = ChangeEvent::new("state");

        assert_eq!(first, second);
        assert_ne!(first, ChangeEvent::new("current_pos"));
    }
}
