//! Cover component (roller shutters, blinds, garage doors)

use std::sync::Arc;

use async_trait::async_trait;
use attribute_store::{Attribute, AttributeStore, ChangeHandler, ListenerId};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::component::{Component, ComponentId, RpcTransport};
use crate::error::{ComponentError, Result};
use crate::status::CoverStatus;

// ============================================================================
// Attributes
// ============================================================================

/// Raw movement state as reported by the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State(pub String);

impl Attribute for State {
    const KEY: &'static str = "state";
}

/// Measured position (0-100), absent until the cover is calibrated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentPos(pub Option<u8>);

impl Attribute for CurrentPos {
    const KEY: &'static str = "current_pos";
}

/// Position the cover is moving towards, absent when no move was requested
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPos(pub Option<u8>);

impl Attribute for TargetPos {
    const KEY: &'static str = "target_pos";
}

/// Whether the cover is calibrated and supports positioning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosControl(pub bool);

impl Attribute for PosControl {
    const KEY: &'static str = "pos_control";
}

// ============================================================================
// CoverState
// ============================================================================

/// Parsed form of the raw cover state string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CoverState {
    Open,
    Closed,
    Opening,
    Closing,
    #[default]
    Stopped,
    Calibrating,
}

impl CoverState {
    /// Parse a state string reported by the device
    ///
    /// Unknown values (including `"idle"`) are treated as stopped.
    pub fn from_raw(state: &str) -> Self {
        match state.to_ascii_lowercase().as_str() {
            "open" => CoverState::Open,
            "closed" => CoverState::Closed,
            "opening" => CoverState::Opening,
            "closing" => CoverState::Closing,
            "calibrating" => CoverState::Calibrating,
            _ => CoverState::Stopped,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CoverState::Open => "open",
            CoverState::Closed => "closed",
            CoverState::Opening => "opening",
            CoverState::Closing => "closing",
            CoverState::Stopped => "stopped",
            CoverState::Calibrating => "calibrating",
        }
    }
}

// ============================================================================
// CoverComponent
// ============================================================================

/// Read access, change notifications and actions of a cover
#[async_trait]
pub trait CoverComponent: Component {
    /// Raw state string (`"opening"`, `"closing"`, `"stopped"`, ...)
    fn state(&self) -> String;

    fn current_pos(&self) -> Option<u8>;

    fn target_pos(&self) -> Option<u8>;

    fn pos_control(&self) -> bool;

    /// Ask the device to move to `pos` (0-100)
    ///
    /// Resolves once the device has accepted the request. Progress is
    /// reported afterwards through the change notifications.
    async fn go_to_position(&self, pos: u8) -> Result<()>;
}

/// A cover component of a Shelly device
///
/// Attributes are written by the device layer through [`update`](Self::update)
/// or [`apply_status`](Self::apply_status); observers read them through
/// [`CoverComponent`] and subscribe with [`Component::on`].
pub struct Cover {
    id: ComponentId,
    attributes: AttributeStore,
    transport: Arc<dyn RpcTransport>,
}

impl Cover {
    pub fn new(id: u8, transport: Arc<dyn RpcTransport>) -> Self {
        let attributes = AttributeStore::new();
        attributes.set(State(CoverState::Stopped.as_str().to_string()));
        attributes.set(CurrentPos(None));
        attributes.set(TargetPos(None));
        attributes.set(PosControl(false));

        Self {
            id: ComponentId::new(id),
            attributes,
            transport,
        }
    }

    /// Create a cover and apply an initial status without notifying anyone
    pub fn with_status(
        id: u8,
        transport: Arc<dyn RpcTransport>,
        status: CoverStatus,
    ) -> Self {
        let cover = Self::new(id, transport);
        cover.update(status);
        cover
    }

    /// Apply a partial status update
    ///
    /// Fields are applied in the order `pos_control`, `current_pos`,
    /// `target_pos`, `state`; each changed field notifies its listeners
    /// before the next one is applied.
    pub fn update(&self, status: CoverStatus) {
        if let Some(enabled) = status.pos_control {
            self.attributes.set(PosControl(enabled));
        }
        if let Some(pos) = status.current_pos {
            self.attributes.set(CurrentPos(pos));
        }
        if let Some(pos) = status.target_pos {
            self.attributes.set(TargetPos(pos));
        }
        if let Some(state) = status.state {
            self.attributes.set(State(state));
        }
    }

    /// Decode and apply the component object of a `NotifyStatus` notification
    pub fn apply_status(&self, status: &Value) -> Result<()> {
        let status = CoverStatus::deserialize(status)?;
        debug!(component = %self.id, ?status, "cover status");
        self.update(status);
        Ok(())
    }

    pub fn attributes(&self) -> &AttributeStore {
        &self.attributes
    }
}

impl Component for Cover {
    fn id(&self) -> ComponentId {
        self.id
    }

    fn on(&self, attribute: &'static str, handler: ChangeHandler) -> ListenerId {
        self.attributes.on(attribute, handler)
    }

    fn off(&self, attribute: &'static str, listener: ListenerId) -> bool {
        self.attributes.off(attribute, listener)
    }
}

#[async_trait]
impl CoverComponent for Cover {
    fn state(&self) -> String {
        self.attributes
            .get::<State>()
            .map(|s| s.0)
            .unwrap_or_else(|| CoverState::default().as_str().to_string())
    }

    fn current_pos(&self) -> Option<u8> {
        self.attributes.get::<CurrentPos>().and_then(|p| p.0)
    }

    fn target_pos(&self) -> Option<u8> {
        self.attributes.get::<TargetPos>().and_then(|p| p.0)
    }

    fn pos_control(&self) -> bool {
        self.attributes
            .get::<PosControl>()
            .map(|p| p.0)
            .unwrap_or(false)
    }

    async fn go_to_position(&self, pos: u8) -> Result<()> {
        if pos > 100 {
            return Err(ComponentError::OutOfRange {
                field: "pos",
                value: pos,
            });
        }

        debug!(component = %self.id, pos, "Cover.GoToPosition");
        self.transport
            .call(
                "Cover.GoToPosition",
                json!({ "id": self.id.value(), "pos": pos }),
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for Cover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cover")
            .field("id", &self.id)
            .field("state", &self.state())
            .field("current_pos", &self.current_pos())
            .field("target_pos", &self.target_pos())
            .field("pos_control", &self.pos_control())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use attribute_store::ChangeEvent;
    use rstest::rstest;
    use std::sync::Mutex;

    fn cover() -> (Cover, Arc<RecordingTransport>) {
        let transport = RecordingTransport::new();
        let cover = Cover::new(0, transport.clone());
        (cover, transport)
    }

    #[rstest]
    #[case("opening", CoverState::Opening)]
    #[case("closing", CoverState::Closing)]
    #[case("open", CoverState::Open)]
    #[case("closed", CoverState::Closed)]
    #[case("stopped", CoverState::Stopped)]
    #[case("calibrating", CoverState::Calibrating)]
    #[case("OPENING", CoverState::Opening)]
    #[case("idle", CoverState::Stopped)]
    #[case("", CoverState::Stopped)]
    fn test_cover_state_from_raw(#[case] raw: &str, #[case] expected: CoverState) {
        assert_eq!(CoverState::from_raw(raw), expected);
    }

    #[test]
    fn test_default_state_is_stopped() {
        assert_eq!(CoverState::default(), CoverState::Stopped);
        assert_eq!(CoverState::default().as_str(), "stopped");
    }

    #[test]
    fn test_new_cover_defaults() {
        let (cover, _) = cover();
        assert_eq!(cover.state(), "stopped");
        assert_eq!(cover.current_pos(), None);
        assert_eq!(cover.target_pos(), None);
        assert!(!cover.pos_control());
    }

    #[test]
    fn test_update_notifies_in_fixed_order() {
        let (cover, _) = cover();
        let order = Arc::new(Mutex::new(Vec::new()));

        for key in [State::KEY, CurrentPos::KEY, TargetPos::KEY, PosControl::KEY] {
            let out = Arc::clone(&order);
            cover.on(
                key,
                Arc::new(move |event: &ChangeEvent| out.lock().unwrap().push(event.attribute_key)),
            );
        }

        cover.update(
            CoverStatus::state("opening")
                .with_target_pos(Some(80))
                .with_current_pos(Some(40))
                .with_pos_control(true),
        );

        assert_eq!(
            *order.lock().unwrap(),
            vec!["pos_control", "current_pos", "target_pos", "state"]
        );
    }

    #[test]
    fn test_unchanged_fields_do_not_notify() {
        let (cover, _) = cover();
        cover.update(CoverStatus::current_pos(40));

        let count = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&count);
        cover.on(
            CurrentPos::KEY,
            Arc::new(move |_: &ChangeEvent| *counter.lock().unwrap() += 1),
        );

        cover.update(CoverStatus::current_pos(40));
        assert_eq!(*count.lock().unwrap(), 0);

        cover.update(CoverStatus::current_pos(41));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn test_apply_status_null_clears_position() {
        let (cover, _) = cover();
        cover.update(CoverStatus::current_pos(40));

        cover
            .apply_status(&json!({"id": 0, "current_pos": null}))
            .unwrap();
        assert_eq!(cover.current_pos(), None);
    }

    #[test]
    fn test_apply_status_rejects_garbage() {
        let (cover, _) = cover();
        let result = cover.apply_status(&json!({"state": 5}));
        assert!(matches!(result, Err(ComponentError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_go_to_position_sends_rpc() {
        let transport = RecordingTransport::new();
        let cover = Cover::new(1, transport.clone());

        cover.go_to_position(80).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, "Cover.GoToPosition");
        assert_eq!(calls[0].params, json!({"id": 1, "pos": 80}));
    }

    #[tokio::test]
    async fn test_go_to_position_validates_range() {
        let (cover, transport) = cover();

        let result = cover.go_to_position(101).await;
        assert!(matches!(
            result,
            Err(ComponentError::OutOfRange { value: 101, .. })
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_go_to_position_propagates_rpc_error() {
        let (cover, transport) = cover();
        transport.fail_with("Cover is not calibrated");

        let result = cover.go_to_position(50).await;
        assert!(matches!(result, Err(ComponentError::Rpc { .. })));
    }
}
