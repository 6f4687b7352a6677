//! Listener registry for attribute change notifications
//!
//! Listeners are registered per attribute key and identified by a
//! [`ListenerId`] token. Removing a listener by token removes exactly the
//! handler that was registered under it, so an observer that keeps its
//! tokens can detach cleanly from a shared emitter without touching other
//! observers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::event::ChangeEvent;

/// Callback invoked when a watched attribute changes
pub type ChangeHandler = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

/// Token identifying one registered listener
///
/// Tokens are never reused within a registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    /// Raw numeric value of the token
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

/// Listeners grouped by attribute key, kept in registration order
#[derive(Default)]
pub(crate) struct Listeners {
    by_key: HashMap<&'static str, Vec<(ListenerId, ChangeHandler)>>,
    next_id: u64,
}

impl Listeners {
    pub(crate) fn add(&mut self, key: &'static str, handler: ChangeHandler) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.by_key.entry(key).or_default().push((id, handler));
        id
    }

    pub(crate) fn remove(&mut self, key: &'static str, id: ListenerId) -> bool {
        let Some(entries) = self.by_key.get_mut(key) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|(existing, _)| *existing != id);
        let removed = entries.len() != before;

        if entries.is_empty() {
            self.by_key.remove(key);
        }
        removed
    }

    /// Clone the handlers for a key so they can run without holding the lock
    pub(crate) fn snapshot(&self, key: &'static str) -> Vec<ChangeHandler> {
        self.by_key
            .get(key)
            .map(|entries| entries.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn count(&self, key: &'static str) -> usize {
        self.by_key.get(key).map(Vec::len).unwrap_or(0)
    }

    pub(crate) fn total(&self) -> usize {
        self.by_key.values().map(Vec::len).sum()
    }
}
