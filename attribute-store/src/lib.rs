//! Typed attribute storage with change notifications
//!
//! Holds the live attributes of one device component and notifies
//! listeners per attribute when a value actually changes.
//!
//! # Features
//!
//! - **Type-safe Storage**: Store and retrieve strongly-typed attributes
//! - **Change Detection**: Listeners only fire when a value really changes
//! - **Keyed Listeners**: Subscribe to one attribute at a time
//! - **Stable Tokens**: Every registration returns a `ListenerId` that
//!   removes exactly that registration
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use attribute_store::{Attribute, AttributeStore};
//!
//! #[derive(Clone, PartialEq, Debug)]
//! struct TargetPos(Option<u8>);
//!
//! impl Attribute for TargetPos {
//!     const KEY: &'static str = "target_pos";
//! }
//!
//! let store = AttributeStore::new();
//! let id = store.on(TargetPos::KEY, Arc::new(|event: &attribute_store::ChangeEvent| {
//!     println!("{} changed", event.attribute_key);
//! }));
//!
//! store.set(TargetPos(Some(80)));
//! assert_eq!(store.get::<TargetPos>(), Some(TargetPos(Some(80))));
//!
//! store.off(TargetPos::KEY, id);
//! ```
//!
//! # Architecture
//!
//! ```text
//! AttributeStore
//!     │
//!     ├── bag: AttributeBag
//!     │       └── HashMap<TypeId, Box<dyn Any>>
//!     │
//!     └── listeners: HashMap<attribute_key, Vec<(ListenerId, ChangeHandler)>>
//! ```

pub mod attribute;
pub mod event;
pub mod listener;
pub mod store;

pub use attribute::Attribute;
pub use event::ChangeEvent;
pub use listener::{ChangeHandler, ListenerId};
pub use store::{AttributeBag, AttributeStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::attribute::Attribute;
    pub use crate::event::ChangeEvent;
    pub use crate::listener::{ChangeHandler, ListenerId};
    pub use crate::store::{AttributeBag, AttributeStore};
}
