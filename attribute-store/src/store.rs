//! Type-erased attribute storage with change notifications
//!
//! - `AttributeBag`: type-erased storage for one component's attributes
//! - `AttributeStore`: a bag plus listeners keyed by attribute

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::attribute::Attribute;
use crate::event::ChangeEvent;
use crate::listener::{ChangeHandler, ListenerId, Listeners};

// ============================================================================
// AttributeBag - type-erased storage for a single component
// ============================================================================

/// Type-erased storage for a component's attributes
///
/// Uses `TypeId` to store and retrieve strongly-typed values.
/// Change detection is built-in via `PartialEq` comparison.
///
/// # Example
///
/// ```rust
/// use attribute_store::{Attribute, AttributeBag};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct Output(bool);
/// impl Attribute for Output {
///     const KEY: &'static str = "output";
/// }
///
/// let mut bag = AttributeBag::new();
/// assert!(bag.set(Output(true)));
/// assert!(!bag.set(Output(true)));
/// assert_eq!(bag.get::<Output>(), Some(Output(true)));
/// ```
pub struct AttributeBag {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl AttributeBag {
    /// Create a new empty bag
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Get an attribute value by type
    pub fn get<A: Attribute>(&self) -> Option<A> {
        self.values
            .get(&TypeId::of::<A>())
            .and_then(|boxed| boxed.downcast_ref::<A>())
            .cloned()
    }

    /// Set an attribute value, returning whether the value changed
    ///
    /// A value set for the first time counts as a change.
    pub fn set<A: Attribute>(&mut self, value: A) -> bool {
        let type_id = TypeId::of::<A>();
        let current = self
            .values
            .get(&type_id)
            .and_then(|boxed| boxed.downcast_ref::<A>());

        if current == Some(&value) {
            return false;
        }

        self.values.insert(type_id, Box::new(value));
        true
    }

    /// Check if an attribute has been set
    pub fn contains<A: Attribute>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<A>())
    }

    /// Number of attributes stored
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the bag is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Default for AttributeBag {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AttributeBag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeBag")
            .field("attribute_count", &self.values.len())
            .finish()
    }
}

// ============================================================================
// AttributeStore - attributes plus change listeners
// ============================================================================

/// Attribute storage for one component with per-attribute change listeners
///
/// Listeners registered with [`on`](Self::on) run synchronously inside
/// [`set`](Self::set), in registration order, after the value has been
/// committed. Neither the bag nor the listener registry is locked while a
/// handler runs, so handlers may read attributes back from the store.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use attribute_store::{Attribute, AttributeStore};
///
/// #[derive(Clone, PartialEq, Debug)]
/// struct State(String);
/// impl Attribute for State {
///     const KEY: &'static str = "state";
/// }
///
/// let store = AttributeStore::new();
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let id = store.on(State::KEY, Arc::new(move |_: &attribute_store::ChangeEvent| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// }));
///
/// store.set(State("opening".into()));
/// store.set(State("opening".into())); // unchanged, no notification
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
///
/// assert!(store.off(State::KEY, id));
/// ```
pub struct AttributeStore {
    bag: RwLock<AttributeBag>,
    listeners: RwLock<Listeners>,
}

impl AttributeStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            bag: RwLock::new(AttributeBag::new()),
            listeners: RwLock::new(Listeners::default()),
        }
    }

    /// Get the current value of an attribute
    ///
    /// Returns `None` if the attribute has never been set.
    pub fn get<A: Attribute>(&self) -> Option<A> {
        self.read_bag().get::<A>()
    }

    /// Set an attribute, notifying its listeners if the value changed
    ///
    /// Returns whether the value changed.
    pub fn set<A: Attribute>(&self, value: A) -> bool {
        let changed = self.write_bag().set(value);

        if changed {
            self.emit(A::KEY);
        }
        changed
    }

    /// Register a listener for changes to the attribute with `key`
    pub fn on(&self, key: &'static str, handler: ChangeHandler) -> ListenerId {
        self.write_listeners().add(key, handler)
    }

    /// Remove a listener previously returned by [`on`](Self::on)
    ///
    /// Returns `false` if no such listener was registered for `key`.
    pub fn off(&self, key: &'static str, id: ListenerId) -> bool {
        self.write_listeners().remove(key, id)
    }

    /// Number of listeners registered for `key`
    pub fn listener_count(&self, key: &'static str) -> usize {
        self.read_listeners().count(key)
    }

    /// Number of listeners registered across all keys
    pub fn total_listeners(&self) -> usize {
        self.read_listeners().total()
    }

    fn emit(&self, key: &'static str) {
        let handlers = self.read_listeners().snapshot(key);

        let event = ChangeEvent::new(key);
        for handler in handlers {
            handler(&event);
        }
    }

    // Every guard is taken through these helpers. A poisoned lock still holds
    // the last committed state, so it is recovered rather than skipped.

    fn read_bag(&self) -> RwLockReadGuard<'_, AttributeBag> {
        self.bag.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_bag(&self) -> RwLockWriteGuard<'_, AttributeBag> {
        self.bag.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_listeners(&self) -> RwLockReadGuard<'_, Listeners> {
        self.listeners.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_listeners(&self) -> RwLockWriteGuard<'_, Listeners> {
        self.listeners.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for AttributeStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for AttributeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributeStore")
            .field("listener_count", &self.total_listeners())
            .finish()
    }
}
