//! Attribute trait for typed, observable component values
//!
//! An attribute is one field of a device component's live status
//! (a cover's position, a light's output, ...). Each attribute type has a
//! key that doubles as the name of its change notification.
//!
//! # Example
//!
//! ```rust
//! use attribute_store::Attribute;
//!
//! #[derive(Clone, PartialEq, Debug)]
//! pub struct CurrentPos(pub Option<u8>);
//!
//! impl Attribute for CurrentPos {
//!     const KEY: &'static str = "current_pos";
//! }
//! ```

/// Marker trait for values stored in an [`AttributeStore`](crate::AttributeStore)
///
/// Attributes must be:
/// - Clone: values are handed out by copy
/// - Send + Sync: stores are shared between the device layer and observers
/// - PartialEq: change detection (listeners only fire on real changes)
/// - 'static: type-erased storage using TypeId
pub trait Attribute: Clone + Send + Sync + PartialEq + 'static {
    /// Key identifying this attribute and its change notification
    ///
    /// Should match the field name the device reports, e.g. `"state"`
    /// or `"target_pos"`.
    const KEY: &'static str;
}
