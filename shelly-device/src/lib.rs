//! Shelly Device Components
//!
//! Live proxies for the sub-units of a Shelly Gen2 device. Each component
//! mirrors the attributes the device reports, notifies listeners per
//! attribute when a value changes, and exposes the device's RPC actions as
//! async methods.
//!
//! # Architecture
//!
//! ```text
//! NotifyStatus ─→ Cover::apply_status ─→ AttributeStore ─→ listeners ("state", "current_pos", ...)
//!
//! go_to_position(80) ─→ RpcTransport::call("Cover.GoToPosition", {id, pos})
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use shelly_device::{Cover, CoverComponent, CoverStatus};
//!
//! let cover = Cover::with_status(0, transport, CoverStatus::current_pos(40).with_pos_control(true));
//! cover.go_to_position(80).await?;
//!
//! // later, from the device connection
//! cover.apply_status(&params["cover:0"])?;
//! ```

pub mod component;
pub mod cover;
pub mod error;
pub mod light;
pub mod status;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use component::{Component, ComponentId, RpcTransport};
pub use cover::{Cover, CoverComponent, CoverState};
pub use error::{ComponentError, Result};
pub use light::{Light, LightComponent};
pub use status::{CoverStatus, LightStatus};

// Attribute keys and listener types used in `Component::on`/`off`
pub use attribute_store::{Attribute, ChangeEvent, ChangeHandler, ListenerId};
