//! Browser connectivity bridge: `navigator.onLine` plus the `online` and
//! `offline` window events.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use bridge_traits::{
    error::Result as BridgeResult,
    network::{BrowserConnectivity, ConnectivityEvent, EventCallback, ListenerId},
    BridgeError,
};
use tracing::{debug, warn};
use wasm_bindgen::{closure::Closure, JsCast};

use crate::error::{js_message, WasmError};

struct AttachedListener {
    event: ConnectivityEvent,
    closure: Closure<dyn FnMut()>,
}

/// Connectivity source backed by the current `window`.
///
/// Attached closures are owned here and dropped when their listener is
/// removed, or when the bridge itself is dropped.
pub struct NavigatorConnectivity {
    window: web_sys::Window,
    next_id: Cell<u64>,
    listeners: RefCell<HashMap<ListenerId, AttachedListener>>,
}

impl NavigatorConnectivity {
    /// Bind to the global `window`.
    pub fn new() -> BridgeResult<Self> {
        let window = web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".into()))?;
        Ok(Self {
            window,
            next_id: Cell::new(1),
            listeners: RefCell::new(HashMap::new()),
        })
    }

    /// Number of attached handlers.
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn detach(&self, listener: &AttachedListener) -> BridgeResult<()> {
        self.window
            .remove_event_listener_with_callback(
                listener.event.event_name(),
                listener.closure.as_ref().unchecked_ref(),
            )
            .map_err(|err| WasmError::Listener(js_message(&err)).into())
    }
}

impl BrowserConnectivity for NavigatorConnectivity {
    fn is_online(&self) -> bool {
        self.window.navigator().on_line()
    }

    fn add_listener(
        &self,
        event: ConnectivityEvent,
        callback: EventCallback,
    ) -> BridgeResult<ListenerId> {
        let closure = Closure::<dyn FnMut()>::new(move || callback());
        self.window
            .add_event_listener_with_callback(
                event.event_name(),
                closure.as_ref().unchecked_ref(),
            )
            .map_err(|err| BridgeError::from(WasmError::Listener(js_message(&err))))?;

        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .insert(id, AttachedListener { event, closure });

        debug!(event = event.event_name(), listener = id.0, "Attached window listener");
        Ok(id)
    }

    fn remove_listener(&self, id: ListenerId) -> BridgeResult<()> {
        let removed = self.listeners.borrow_mut().remove(&id);
        match removed {
            Some(listener) => self.detach(&listener),
            None => Ok(()),
        }
    }
}

impl Drop for NavigatorConnectivity {
    fn drop(&mut self) {
        let listeners: Vec<AttachedListener> =
            self.listeners.borrow_mut().drain().map(|(_, l)| l).collect();
        for listener in &listeners {
            if let Err(e) = self.detach(listener) {
                warn!(error = %e, "Failed to detach window listener on drop");
            }
        }
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::sync::Arc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test::wasm_bindgen_test_configure!(run_in_browser);

    fn dispatch(name: &str) {
        let window = web_sys::window().expect("window");
        let event = web_sys::Event::new(name).expect("event");
        window.dispatch_event(&event).expect("dispatch");
    }

    #[wasm_bindgen_test]
    fn online_flag_matches_navigator() {
        let connectivity = NavigatorConnectivity::new().expect("init");
        let navigator = web_sys::window().expect("window").navigator();
        assert_eq!(connectivity.is_online(), navigator.on_line());
    }

    #[wasm_bindgen_test]
    fn listener_fires_until_removed() {
        console_error_panic_hook::set_once();
        let connectivity = NavigatorConnectivity::new().expect("init");
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();

        let id = connectivity
            .add_listener(
                ConnectivityEvent::Offline,
                Arc::new(move || counter.set(counter.get() + 1)),
            )
            .expect("attach");

        dispatch("offline");
        dispatch("online");
        assert_eq!(hits.get(), 1);

        connectivity.remove_listener(id).expect("detach");
        connectivity.remove_listener(id).expect("detach twice");
        dispatch("offline");
        assert_eq!(hits.get(), 1);
        assert_eq!(connectivity.listener_count(), 0);
    }
}
