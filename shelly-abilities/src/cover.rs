//! Cover ability: a cover component published as a door, window or window covering

use std::sync::{Arc, Weak};

use futures::FutureExt;
use hap_model::{
    Accessory, CharacteristicType, CharacteristicValue, HapStatus, Service, ServiceType, SetHandler,
};
use shelly_device::cover::{CurrentPos, State, TargetPos};
use shelly_device::{Attribute, ChangeEvent, ChangeHandler, CoverComponent};
use tracing::{debug, warn};

use crate::ability::{Ability, AbilityCore};
use crate::command::{position_from_value, CommandTranslator};
use crate::config::CoverOptions;
use crate::kind::CoverKind;
use crate::projection::CoverProjection;

/// Keeps a cover service in sync with a cover component
///
/// The service shows the projected position state, current position and
/// target position. Every change notification re-pushes all three values.
/// A change of the current position alone also moves the shown target to
/// the current position, since manual actuation never updates the
/// component's target.
///
/// Writes to the target position are forwarded to
/// [`CoverComponent::go_to_position`].
pub struct CoverAbility {
    core: AbilityCore,
    component: Arc<dyn CoverComponent>,
    kind: CoverKind,
}

impl CoverAbility {
    pub fn new(component: Arc<dyn CoverComponent>, kind: CoverKind) -> Self {
        let id = component.id();
        Self {
            core: AbilityCore::new(kind.instance_name(id), kind.instance_key(id)),
            component,
            kind,
        }
    }

    /// Create the ability described by `options`, or `None` when the cover is inactive
    pub fn from_options(component: Arc<dyn CoverComponent>, options: &CoverOptions) -> Option<Self> {
        if !options.active {
            debug!(component = %component.id(), "cover disabled in options");
            return None;
        }
        Some(Self::new(component, options.kind))
    }

    pub fn kind(&self) -> CoverKind {
        self.kind
    }

    pub fn component(&self) -> &Arc<dyn CoverComponent> {
        &self.component
    }

    /// Projection of the component's current attributes
    pub fn projection(&self) -> CoverProjection {
        CoverProjection::of(self.component.as_ref())
    }

    fn target_handler(&self) -> SetHandler {
        let translator = CommandTranslator::new(self.core.key(), self.core.attached_flag());
        let component = Arc::downgrade(&self.component);

        Arc::new(move |value: CharacteristicValue| {
            let translator = translator.clone();
            let component = component.clone();

            async move {
                let position = position_from_value(&value)?;
                let component = component
                    .upgrade()
                    .ok_or(HapStatus::ServiceCommunicationFailure)?;

                translator
                    .execute("target position", position, component.target_pos(), |pos| async move {
                        component.go_to_position(pos).await
                    })
                    .await
                    .map(|_| ())
            }
            .boxed()
        })
    }

    fn change_handler(&self, service: &Arc<dyn Service>, follow_current: bool) -> ChangeHandler {
        let component = Arc::downgrade(&self.component);
        let service = Arc::clone(service);
        let key = self.core.key().to_string();

        Arc::new(move |event: &ChangeEvent| {
            on_cover_change(&component, service.as_ref(), &key, event, follow_current)
        })
    }
}

fn push_projection(service: &dyn Service, projection: &CoverProjection) {
    service
        .characteristic(CharacteristicType::PositionState)
        .update_value(projection.position_state.into());
    service
        .characteristic(CharacteristicType::TargetPosition)
        .update_value(projection.target_position.into());
    service
        .characteristic(CharacteristicType::CurrentPosition)
        .update_value(projection.current_position.into());
}

fn on_cover_change(
    component: &Weak<dyn CoverComponent>,
    service: &dyn Service,
    key: &str,
    event: &ChangeEvent,
    follow_current: bool,
) {
    let Some(component) = component.upgrade() else {
        return;
    };

    let projection = CoverProjection::of(component.as_ref());
    debug!(
        ability = key,
        attribute = event.attribute_key,
        position_state = ?projection.position_state,
        current = projection.current_position,
        target = projection.target_position,
        "cover changed"
    );

    push_projection(service, &projection);

    if follow_current {
        service
            .characteristic(CharacteristicType::TargetPosition)
            .update_value(projection.current_position.into());
    }
}

impl Ability for CoverAbility {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn key(&self) -> &str {
        self.core.key()
    }

    fn service_type(&self) -> ServiceType {
        self.kind.service_type()
    }

    fn setup(&mut self, accessory: &dyn Accessory) {
        self.core.bind_service(accessory, self.kind.service_type());
        self.initialize();
    }

    fn initialize(&mut self) {
        if self.core.is_inert() {
            debug!(ability = %self.core.key(), "inert, not initializing");
            return;
        }

        if self.core.is_attached() {
            debug!(ability = %self.core.key(), "already initialized");
            return;
        }

        let Some(service) = self.core.service() else {
            warn!(ability = %self.core.key(), "initialize called before setup");
            return;
        };

        if !self.component.pos_control() {
            warn!(ability = %self.core.key(), "Only covers with position control are supported");
            self.core.mark_inert();
            return;
        }

        let projection = self.projection();
        service
            .set_characteristic(CharacteristicType::PositionState, projection.position_state.into())
            .set_characteristic(CharacteristicType::CurrentPosition, projection.current_position.into())
            .set_characteristic(CharacteristicType::TargetPosition, projection.target_position.into());

        service
            .characteristic(CharacteristicType::TargetPosition)
            .on_set(self.target_handler());

        let handlers = [
            (State::KEY, self.change_handler(&service, false)),
            (CurrentPos::KEY, self.change_handler(&service, true)),
            (TargetPos::KEY, self.change_handler(&service, false)),
        ];
        for (attribute, handler) in handlers {
            self.core
                .subscriptions_mut()
                .subscribe(self.component.as_ref(), attribute, handler);
        }

        self.core.mark_attached();
        debug!(ability = %self.core.key(), ?projection, "cover ability initialized");
    }

    fn detach(&mut self) {
        self.core.detach(self.component.as_ref());
    }

    fn is_active(&self) -> bool {
        self.core.is_attached()
    }
}

impl Drop for CoverAbility {
    fn drop(&mut self) {
        self.core.detach(self.component.as_ref());
    }
}

impl std::fmt::Debug for CoverAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoverAbility")
            .field("kind", &self.kind)
            .field("core", &self.core)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hap_model::{MemoryAccessory, PositionState};
    use shelly_device::testing::RecordingTransport;
    use shelly_device::{Cover, CoverStatus};

    fn calibrated(current: u8) -> Arc<Cover> {
        Arc::new(Cover::with_status(
            0,
            RecordingTransport::new(),
            CoverStatus::current_pos(current).with_pos_control(true),
        ))
    }

    #[test]
    fn test_names_follow_kind() {
        let ability = CoverAbility::new(calibrated(0), CoverKind::WindowCovering);
        assert_eq!(ability.name(), "Window Covering 1");
        assert_eq!(ability.key(), "windowCovering-0");
        assert_eq!(ability.service_type(), ServiceType::WindowCovering);
    }

    #[test]
    fn test_from_options() {
        let inactive = CoverOptions {
            kind: CoverKind::Door,
            active: false,
        };
        assert!(CoverAbility::from_options(calibrated(0), &inactive).is_none());

        let ability =
            CoverAbility::from_options(calibrated(0), &CoverOptions::with_kind(CoverKind::Door)).unwrap();
        assert_eq!(ability.kind(), CoverKind::Door);
    }

    #[test]
    fn test_initialize_without_setup_is_inert() {
        let cover = calibrated(40);
        let mut ability = CoverAbility::new(cover.clone(), CoverKind::Window);

        ability.initialize();
        assert!(!ability.is_active());
        assert_eq!(cover.attributes().total_listeners(), 0);
    }

    #[test]
    fn test_listeners_do_not_keep_component_alive() {
        let cover = calibrated(40);
        let accessory = MemoryAccessory::new();
        let mut ability = CoverAbility::new(cover.clone(), CoverKind::Window);
        ability.setup(&accessory);

        let weak = Arc::downgrade(&cover);
        drop(cover);
        drop(ability);
        assert!(weak.upgrade().is_none());
    }

    #[test]
    fn test_projection_reads_component() {
        let cover = calibrated(40);
        cover.update(CoverStatus::state("closing").with_target_pos(Some(0)));
        let ability = CoverAbility::new(cover, CoverKind::Window);

        assert_eq!(
            ability.projection(),
            CoverProjection {
                position_state: PositionState::Decreasing,
                current_position: 40,
                target_position: 0,
            }
        );
    }
}
