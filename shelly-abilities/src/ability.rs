//! The ability lifecycle and the state every ability shares

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use hap_model::{Accessory, CharacteristicType, Service, ServiceType};
use shelly_device::{ChangeHandler, Component, ListenerId};
use tracing::debug;

/// Binds one device component to one HomeKit service
///
/// Lifecycle: [`setup`](Self::setup) obtains the service and initializes,
/// [`detach`](Self::detach) removes every listener the ability registered.
/// An ability can be initialized again after a detach, unless it turned
/// inert because its component is unsupported. Dropping an ability detaches it.
pub trait Ability: Send {
    /// Display name of the service, e.g. `"Window 1"`
    fn name(&self) -> &str;

    /// Service subtype, unique per accessory, e.g. `"window-0"`
    fn key(&self) -> &str;

    fn service_type(&self) -> ServiceType;

    /// Obtain (or add) the service on `accessory`, then initialize
    fn setup(&mut self, accessory: &dyn Accessory);

    /// Seed the service and start following the component
    ///
    /// Does nothing when the ability is already active, inert, or has no service.
    fn initialize(&mut self);

    /// Stop following the component. Safe to call any number of times.
    fn detach(&mut self);

    /// Whether the ability is following its component
    fn is_active(&self) -> bool;
}

// ============================================================================
// Subscriptions
// ============================================================================

/// Listeners an ability registered on its component
///
/// Only listeners in this list are ever removed, so other observers of the
/// same component are left alone.
#[derive(Debug, Default)]
pub struct Subscriptions {
    entries: Vec<(&'static str, ListenerId)>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<C: Component + ?Sized>(
        &mut self,
        component: &C,
        attribute: &'static str,
        handler: ChangeHandler,
    ) -> ListenerId {
        let id = component.on(attribute, handler);
        self.entries.push((attribute, id));
        id
    }

    /// Remove every owned listener from `component`, returning how many were removed
    pub fn release<C: Component + ?Sized>(&mut self, component: &C) -> usize {
        self.entries
            .drain(..)
            .filter(|&(attribute, id)| component.off(attribute, id))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// AbilityCore
// ============================================================================

/// Identity, service and subscription state shared by all abilities
pub struct AbilityCore {
    name: String,
    key: String,
    service: Option<Arc<dyn Service>>,
    subscriptions: Subscriptions,
    attached: Arc<AtomicBool>,
    inert: bool,
}

impl AbilityCore {
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            service: None,
            subscriptions: Subscriptions::new(),
            attached: Arc::new(AtomicBool::new(false)),
            inert: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the service from `accessory` and seed its name
    pub fn bind_service(&mut self, accessory: &dyn Accessory, service_type: ServiceType) {
        let service = accessory.service(service_type, &self.name, &self.key);
        service.set_characteristic(CharacteristicType::Name, self.name.as_str().into());
        debug!(ability = %self.key, service = %service_type, "service bound");
        self.service = Some(service);
    }

    pub fn service(&self) -> Option<Arc<dyn Service>> {
        self.service.clone()
    }

    pub fn subscriptions_mut(&mut self) -> &mut Subscriptions {
        &mut self.subscriptions
    }

    /// Flag read by the ability's command translators
    pub fn attached_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.attached)
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }

    pub fn mark_attached(&self) {
        self.attached.store(true, Ordering::Release);
    }

    /// Refuse every later `initialize` on this instance
    pub fn mark_inert(&mut self) {
        self.inert = true;
    }

    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Stop accepting commands and release every owned listener
    pub fn detach<C: Component + ?Sized>(&mut self, component: &C) {
        let was_attached = self.attached.swap(false, Ordering::AcqRel);
        let released = self.subscriptions.release(component);
        if was_attached || released > 0 {
            debug!(ability = %self.key, released, "detached");
        }
    }
}

impl std::fmt::Debug for AbilityCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AbilityCore")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("bound", &self.service.is_some())
            .field("subscriptions", &self.subscriptions.len())
            .field("attached", &self.is_attached())
            .field("inert", &self.inert)
            .finish()
    }
}
