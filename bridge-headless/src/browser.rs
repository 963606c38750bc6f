//! Browser storage and connectivity simulations

use bridge_traits::{
    error::Result,
    network::{BrowserConnectivity, ConnectivityEvent, EventCallback, ListenerId},
    storage::BrowserStorage,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use tracing::debug;

use crate::lock;

/// In-memory stand-in for `window.localStorage`
#[derive(Debug, Default)]
pub struct MemoryBrowserStorage {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBrowserStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BrowserStorage for MemoryBrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        lock(&self.entries).clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(lock(&self.entries).keys().cloned().collect())
    }
}

/// Browser online flag with `online`/`offline` event dispatch
///
/// [`set_online`](Self::set_online) behaves like the browser: it flips
/// `navigator.onLine` and then fires the matching window event to every
/// listener registered for it, in registration order.
pub struct SimulatedBrowserConnectivity {
    online: AtomicBool,
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<ListenerId, (ConnectivityEvent, EventCallback)>>,
}

impl SimulatedBrowserConnectivity {
    pub fn new(online: bool) -> Self {
        Self {
            online: AtomicBool::new(online),
            next_id: AtomicU64::new(1),
            listeners: Mutex::new(BTreeMap::new()),
        }
    }

    /// Flip the online flag and dispatch the corresponding event.
    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
        let event = if online {
            ConnectivityEvent::Online
        } else {
            ConnectivityEvent::Offline
        };
        self.dispatch(event);
    }

    /// Fire `event` without touching the online flag.
    pub fn dispatch(&self, event: ConnectivityEvent) {
        // Callbacks run outside the lock so they may add or remove listeners.
        let callbacks: Vec<EventCallback> = lock(&self.listeners)
            .values()
            .filter(|(registered, _)| *registered == event)
            .map(|(_, callback)| callback.clone())
            .collect();

        debug!(event = event.event_name(), listeners = callbacks.len(), "Dispatching connectivity event");

        for callback in callbacks {
            callback();
        }
    }

    /// Number of registered handlers across both events
    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl BrowserConnectivity for SimulatedBrowserConnectivity {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }

    fn add_listener(
        &self,
        event: ConnectivityEvent,
        callback: EventCallback,
    ) -> Result<ListenerId> {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        lock(&self.listeners).insert(id, (event, callback));
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> Result<()> {
        lock(&self.listeners).remove(&id);
        Ok(())
    }
}
