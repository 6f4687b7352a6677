//! Light ability: a dimmer channel published as a lightbulb

use std::sync::{Arc, Weak};

use futures::FutureExt;
use hap_model::{
    Accessory, CharacteristicType, CharacteristicValue, HapStatus, Service, ServiceType, SetHandler,
};
use shelly_device::light::{Brightness, Output};
use shelly_device::{Attribute, ChangeEvent, ChangeHandler, LightComponent};
use tracing::{debug, warn};

use crate::ability::{Ability, AbilityCore};
use crate::command::{bool_from_value, position_from_value, CommandTranslator};
use crate::config::LightOptions;
use crate::projection::LightProjection;

const LABEL: &str = "Light";
const SLUG: &str = "light";

/// Keeps a lightbulb service in sync with a light component
///
/// Both `On` and `Brightness` are re-pushed whenever the output or the
/// brightness changes.
pub struct LightAbility {
    core: AbilityCore,
    component: Arc<dyn LightComponent>,
}

impl LightAbility {
    pub fn new(component: Arc<dyn LightComponent>) -> Self {
        let id = component.id();
        Self {
            core: AbilityCore::new(
                format!("{} {}", LABEL, id.index()),
                format!("{}-{}", SLUG, id),
            ),
            component,
        }
    }

    pub fn from_options(component: Arc<dyn LightComponent>, options: &LightOptions) -> Option<Self> {
        if !options.active {
            debug!(component = %component.id(), "light disabled in options");
            return None;
        }
        Some(Self::new(component))
    }

    pub fn projection(&self) -> LightProjection {
        LightProjection::of(self.component.as_ref())
    }

    fn on_handler(&self) -> SetHandler {
        let translator = CommandTranslator::new(self.core.key(), self.core.attached_flag());
        let component = Arc::downgrade(&self.component);

        Arc::new(move |value: CharacteristicValue| {
            let translator = translator.clone();
            let component = component.clone();

            async move {
                let on = bool_from_value(&value)?;
                let component = component
                    .upgrade()
                    .ok_or(HapStatus::ServiceCommunicationFailure)?;

                translator
                    .execute("on", on, Some(component.output()), |on| async move {
                        component.set_output(on).await
                    })
                    .await
                    .map(|_| ())
            }
            .boxed()
        })
    }

    fn brightness_handler(&self) -> SetHandler {
        let translator = CommandTranslator::new(self.core.key(), self.core.attached_flag());
        let component = Arc::downgrade(&self.component);

        Arc::new(move |value: CharacteristicValue| {
            let translator = translator.clone();
            let component = component.clone();

            async move {
                let level = position_from_value(&value)?;
                let component = component
                    .upgrade()
                    .ok_or(HapStatus::ServiceCommunicationFailure)?;

                translator
                    .execute("brightness", level, component.brightness(), |level| async move {
                        component.set_brightness(level).await
                    })
                    .await
                    .map(|_| ())
            }
            .boxed()
        })
    }

    fn change_handler(&self, service: &Arc<dyn Service>) -> ChangeHandler {
        let component = Arc::downgrade(&self.component);
        let service = Arc::clone(service);
        let key = self.core.key().to_string();

        Arc::new(move |event: &ChangeEvent| on_light_change(&component, service.as_ref(), &key, event))
    }
}

fn on_light_change(
    component: &Weak<dyn LightComponent>,
    service: &dyn Service,
    key: &str,
    event: &ChangeEvent,
) {
    let Some(component) = component.upgrade() else {
        return;
    };

    let projection = LightProjection::of(component.as_ref());
    debug!(
        ability = key,
        attribute = event.attribute_key,
        on = projection.on,
        brightness = projection.brightness,
        "light changed"
    );

    service
        .characteristic(CharacteristicType::On)
        .update_value(projection.on.into());
    service
        .characteristic(CharacteristicType::Brightness)
        .update_value(projection.brightness.into());
}

impl Ability for LightAbility {
    fn name(&self) -> &str {
        self.core.name()
    }

    fn key(&self) -> &str {
        self.core.key()
    }

    fn service_type(&self) -> ServiceType {
        ServiceType::Lightbulb
    }

    fn setup(&mut self, accessory: &dyn Accessory) {
        self.core.bind_service(accessory, ServiceType::Lightbulb);
        self.initialize();
    }

    fn initialize(&mut self) {
        if self.core.is_attached() {
            debug!(ability = %self.core.key(), "already initialized");
            return;
        }

        let Some(service) = self.core.service() else {
            warn!(ability = %self.core.key(), "initialize called before setup");
            return;
        };

        let projection = self.projection();
        service
            .set_characteristic(CharacteristicType::On, projection.on.into())
            .set_characteristic(CharacteristicType::Brightness, projection.brightness.into());

        service
            .characteristic(CharacteristicType::On)
            .on_set(self.on_handler());
        service
            .characteristic(CharacteristicType::Brightness)
            .on_set(self.brightness_handler());

        for attribute in [Output::KEY, Brightness::KEY] {
            let handler = self.change_handler(&service);
            self.core
                .subscriptions_mut()
                .subscribe(self.component.as_ref(), attribute, handler);
        }

        self.core.mark_attached();
        debug!(ability = %self.core.key(), ?projection, "light ability initialized");
    }

    fn detach(&mut self) {
        self.core.detach(self.component.as_ref());
    }

    fn is_active(&self) -> bool {
        self.core.is_attached()
    }
}

impl Drop for LightAbility {
    fn drop(&mut self) {
        self.core.detach(self.component.as_ref());
    }
}

impl std::fmt::Debug for LightAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightAbility").field("core", &self.core).finish()
    }
}
