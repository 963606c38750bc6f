//! Convenience helpers for wiring the browser bridges together.
//!
//! Host shells can use [`build_wasm_bridges`] to construct both browser
//! bridges in one call. The result plays the role that `bridge-headless`
//! plays for hosts without a browser.

use std::sync::Arc;

use bridge_traits::{
    error::Result as BridgeResult,
    network::BrowserConnectivity,
    storage::BrowserStorage,
};
use tracing::debug;

use crate::{network::NavigatorConnectivity, storage::LocalStorageBackend};

/// Configuration for [`build_wasm_bridges`].
#[derive(Debug, Clone)]
pub struct WasmBridgeConfig {
    /// Logical namespace for `localStorage` keys.
    pub namespace: String,
}

impl WasmBridgeConfig {
    /// Create a new config using the provided namespace.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }
}

impl Default for WasmBridgeConfig {
    fn default() -> Self {
        Self::new("device-capabilities")
    }
}

/// Fully constructed browser bridge objects ready for injection into the core.
pub struct WasmBridgeSet {
    /// Namespaced `localStorage`.
    pub storage: Arc<dyn BrowserStorage>,
    /// `navigator.onLine` and window connectivity events.
    pub connectivity: Arc<dyn BrowserConnectivity>,
}

impl WasmBridgeSet {
    /// Convenience accessor to clone the storage bridge.
    pub fn storage(&self) -> Arc<dyn BrowserStorage> {
        Arc::clone(&self.storage)
    }

    /// Convenience accessor to clone the connectivity bridge.
    pub fn connectivity(&self) -> Arc<dyn BrowserConnectivity> {
        Arc::clone(&self.connectivity)
    }
}

/// Build the default browser bridge stack.
///
/// # Errors
///
/// `BridgeError::NotAvailable` outside a window context (e.g. in a worker) or
/// when `localStorage` is disabled.
pub fn build_wasm_bridges(config: WasmBridgeConfig) -> BridgeResult<WasmBridgeSet> {
    let storage: Arc<dyn BrowserStorage> = Arc::new(LocalStorageBackend::new(&config.namespace)?);
    let connectivity: Arc<dyn BrowserConnectivity> = Arc::new(NavigatorConnectivity::new()?);

    debug!(namespace = %config.namespace, "Browser bridges ready");

    Ok(WasmBridgeSet {
        storage,
        connectivity,
    })
}
