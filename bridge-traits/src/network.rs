//! Network Monitoring Abstraction
//!
//! Provides connectivity snapshots and change notifications from either the
//! native shell or the browser.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::{
    error::Result,
    platform::{PlatformSend, PlatformSendSync},
};

/// Network transport type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionType {
    /// WiFi connection
    Wifi,
    /// Cellular/mobile data connection
    Cellular,
    /// No connection
    None,
    /// Connected through a transport the platform does not classify
    Unknown,
}

impl ConnectionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            ConnectionType::Wifi => "wifi",
            ConnectionType::Cellular => "cellular",
            ConnectionType::None => "none",
            ConnectionType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ConnectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time connectivity snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkStatus {
    pub connected: bool,
    pub connection_type: ConnectionType,
}

impl NetworkStatus {
    pub const fn new(connected: bool, connection_type: ConnectionType) -> Self {
        Self {
            connected,
            connection_type,
        }
    }

    /// What the browser's online flag implies. The browser does not expose
    /// the transport, so WiFi is the best guess.
    pub const fn browser_online() -> Self {
        Self::new(true, ConnectionType::Wifi)
    }

    pub const fn offline() -> Self {
        Self::new(false, ConnectionType::None)
    }

    /// Used when the monitor could not be queried.
    pub const fn unknown() -> Self {
        Self::new(false, ConnectionType::Unknown)
    }
}

/// Callback invoked with every status change delivered by a native monitor.
#[cfg(not(target_arch = "wasm32"))]
pub type StatusCallback = Arc<dyn Fn(NetworkStatus) + Send + Sync>;

#[cfg(target_arch = "wasm32")]
pub type StatusCallback = Arc<dyn Fn(NetworkStatus)>;

/// Callback invoked when a browser connectivity event fires.
#[cfg(not(target_arch = "wasm32"))]
pub type EventCallback = Arc<dyn Fn() + Send + Sync>;

#[cfg(target_arch = "wasm32")]
pub type EventCallback = Arc<dyn Fn()>;

/// Native connectivity monitor trait
///
/// # Platform Support
///
/// - **iOS**: Network framework (`NWPathMonitor`)
/// - **Android**: ConnectivityManager
///
/// Listener registration goes through the device bridge and therefore
/// resolves asynchronously; the returned handle is the only way to remove the
/// listener again.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::network::NativeConnectivity;
///
/// async fn online(monitor: &dyn NativeConnectivity) -> bool {
///     monitor.get_status().await.map(|s| s.connected).unwrap_or(false)
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NativeConnectivity: PlatformSendSync {
    /// Get the current status
    async fn get_status(&self) -> Result<NetworkStatus>;

    /// Register a listener for status changes
    ///
    /// Events must be delivered in the order the OS reports them.
    async fn add_status_listener(
        &self,
        callback: StatusCallback,
    ) -> Result<Box<dyn NativeListenerHandle>>;
}

/// Handle to one registered native listener
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NativeListenerHandle: PlatformSend {
    /// Remove exactly this listener
    async fn remove(self: Box<Self>) -> Result<()>;
}

/// Browser connectivity events (`window` `online` / `offline`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

impl ConnectivityEvent {
    /// DOM event name
    pub const fn event_name(self) -> &'static str {
        match self {
            ConnectivityEvent::Online => "online",
            ConnectivityEvent::Offline => "offline",
        }
    }
}

/// Identifier of a registered browser listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Browser connectivity trait
///
/// - **Web**: `navigator.onLine` plus `window.addEventListener("online"|"offline")`
pub trait BrowserConnectivity: PlatformSendSync {
    /// Current value of the browser's online flag
    fn is_online(&self) -> bool;

    /// Attach a handler for one connectivity event
    fn add_listener(&self, event: ConnectivityEvent, callback: EventCallback)
        -> Result<ListenerId>;

    /// Detach a handler. Unknown ids are ignored.
    fn remove_listener(&self, id: ListenerId) -> Result<()>;
}
