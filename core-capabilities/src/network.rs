//! # Network Observer
//!
//! Connectivity snapshots and change notifications.
//!
//! - **iOS / Android**: the native connectivity monitor
//! - **Web**: `navigator.onLine` plus the `online`/`offline` window events.
//!   The browser does not expose the transport, so online is reported as
//!   WiFi and offline as `none`.
//!
//! ## Subscriptions
//!
//! [`NetworkObserver::on_network_status_change`] returns immediately with a
//! [`Subscription`]. On native platforms the listener is registered by a
//! detached task because the device bridge answers asynchronously. The
//! subscription's active flag is checked under the registration lock right
//! before the native handle is stored; if `unsubscribe` ran first, the task
//! removes the handle itself. Either way, no listener outlives its
//! subscription and no callback runs after `unsubscribe` has started.

use crate::platform::PlatformDetector;
use crate::task::spawn_detached;
use bridge_traits::{
    BrowserConnectivity, ConnectivityEvent, EventCallback, ListenerId, NativeConnectivity,
    NativeListenerHandle, NetworkStatus, StatusCallback,
};
use core_runtime::{config::CapabilityConfig, Error, Result};
use futures::lock::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Callback accepted by [`NetworkObserver::on_network_status_change`]
#[cfg(not(target_arch = "wasm32"))]
pub trait StatusListener: Fn(NetworkStatus) + Send + Sync + 'static {}

#[cfg(not(target_arch = "wasm32"))]
impl<F> StatusListener for F where F: Fn(NetworkStatus) + Send + Sync + 'static {}

/// Callback accepted by [`NetworkObserver::on_network_status_change`]
#[cfg(target_arch = "wasm32")]
pub trait StatusListener: Fn(NetworkStatus) + 'static {}

#[cfg(target_arch = "wasm32")]
impl<F> StatusListener for F where F: Fn(NetworkStatus) + 'static {}

#[derive(Clone)]
enum NetworkBackend {
    Native(Arc<dyn NativeConnectivity>),
    Browser(Arc<dyn BrowserConnectivity>),
}

/// Platform-independent connectivity source
#[derive(Clone)]
pub struct NetworkObserver {
    platform: PlatformDetector,
    backend: NetworkBackend,
}

impl std::fmt::Debug for NetworkObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            NetworkBackend::Native(_) => "native",
            NetworkBackend::Browser(_) => "browser",
        };
        f.debug_struct("NetworkObserver")
            .field("platform", &self.platform.kind())
            .field("backend", &backend)
            .finish()
    }
}

impl NetworkObserver {
    /// Build the observer for the configured platform.
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` if the bridge the platform needs is absent.
    pub fn from_config(config: &CapabilityConfig) -> Result<Self> {
        let platform = PlatformDetector::from_config(config);
        let backend = if platform.is_native() {
            let monitor = config.native_connectivity.clone().ok_or_else(|| {
                Error::missing(
                    "NativeConnectivity",
                    format!(
                        "network status on {} needs a native connectivity monitor",
                        platform.kind()
                    ),
                )
            })?;
            NetworkBackend::Native(monitor)
        } else {
            let connectivity = config.browser_connectivity.clone().ok_or_else(|| {
                Error::missing(
                    "BrowserConnectivity",
                    "network status on web needs browser connectivity",
                )
            })?;
            NetworkBackend::Browser(connectivity)
        };

        Ok(Self { platform, backend })
    }

    pub fn platform(&self) -> PlatformDetector {
        self.platform
    }

    /// Current connectivity snapshot.
    ///
    /// A native monitor fault is reported and yields
    /// `{connected: false, type: unknown}`.
    pub async fn get_network_status(&self) -> NetworkStatus {
        match &self.backend {
            NetworkBackend::Native(monitor) => match monitor.get_status().await {
                Ok(status) => status,
                Err(error) => {
                    warn!(error = %error, "Failed to query native network status");
                    NetworkStatus::unknown()
                }
            },
            NetworkBackend::Browser(connectivity) => browser_status(connectivity.is_online()),
        }
    }

    pub async fn is_connected(&self) -> bool {
        self.get_network_status().await.connected
    }

    /// Register `callback` for every status change until unsubscribed.
    ///
    /// Returns immediately. Events are delivered in platform order without
    /// coalescing.
    pub fn on_network_status_change<F>(&self, callback: F) -> Subscription
    where
        F: StatusListener,
    {
        let subscription = Subscription::pending();
        let callback = Arc::new(callback);

        match &self.backend {
            NetworkBackend::Native(monitor) => {
                register_native(monitor.clone(), &subscription, callback);
                subscription
            }
            NetworkBackend::Browser(connectivity) => {
                let registration =
                    register_browser(connectivity.clone(), &subscription, callback);
                subscription.settled(registration)
            }
        }
    }
}

fn register_native<F>(
    monitor: Arc<dyn NativeConnectivity>,
    subscription: &Subscription,
    callback: Arc<F>,
) where
    F: StatusListener,
{
    let id = subscription.id;
    let active = subscription.active.clone();
    let slot = subscription.registration.clone();

    let gate = active.clone();
    let forward: StatusCallback = Arc::new(move |status| {
        if gate.load(Ordering::SeqCst) {
            callback(status);
        }
    });

    spawn_detached(async move {
        let registered = monitor.add_status_listener(forward).await;
        let mut slot = slot.lock().await;

        let handle = match registered {
            Ok(handle) => handle,
            Err(error) => {
                warn!(subscription = %id, error = %error, "Failed to register native network listener");
                active.store(false, Ordering::SeqCst);
                *slot = Registration::Released;
                return;
            }
        };

        if active.load(Ordering::SeqCst) {
            debug!(subscription = %id, "Native network listener registered");
            *slot = Registration::Native(handle);
            return;
        }

        drop(slot);
        match handle.remove().await {
            Ok(()) => debug!(subscription = %id, "Removed listener that resolved after unsubscribe"),
            Err(error) => {
                warn!(subscription = %id, error = %error, "Failed to remove late native listener")
            }
        }
    });
}

fn browser_status(online: bool) -> NetworkStatus {
    if online {
        NetworkStatus::browser_online()
    } else {
        NetworkStatus::offline()
    }
}

fn register_browser<F>(
    connectivity: Arc<dyn BrowserConnectivity>,
    subscription: &Subscription,
    callback: Arc<F>,
) -> Registration
where
    F: StatusListener,
{
    let handler = |online: bool| -> EventCallback {
        let gate = subscription.active.clone();
        let callback = callback.clone();
        Arc::new(move || {
            if gate.load(Ordering::SeqCst) {
                callback(browser_status(online));
            }
        })
    };

    let registered = connectivity
        .add_listener(ConnectivityEvent::Online, handler(true))
        .and_then(|online| {
            match connectivity.add_listener(ConnectivityEvent::Offline, handler(false)) {
                Ok(offline) => Ok([online, offline]),
                Err(error) => {
                    if let Err(cleanup) = connectivity.remove_listener(online) {
                        warn!(error = %cleanup, "Failed to detach online handler");
                    }
                    Err(error)
                }
            }
        });

    match registered {
        Ok(ids) => {
            debug!(subscription = %subscription.id, "Browser network listeners attached");
            Registration::Browser { connectivity, ids }
        }
        Err(error) => {
            warn!(subscription = %subscription.id, error = %error, "Failed to attach browser network listeners");
            subscription.active.store(false, Ordering::SeqCst);
            Registration::Released
        }
    }
}

enum Registration {
    /// Native registration still in flight
    Pending,
    Native(Box<dyn NativeListenerHandle>),
    Browser {
        connectivity: Arc<dyn BrowserConnectivity>,
        ids: [ListenerId; 2],
    },
    Released,
}

/// Handle to one network status listener
///
/// Dropping a subscription does not remove the listener; call
/// [`unsubscribe`](Self::unsubscribe).
pub struct Subscription {
    id: Uuid,
    active: Arc<AtomicBool>,
    registration: Arc<Mutex<Registration>>,
}

impl Subscription {
    fn pending() -> Self {
        Self {
            id: Uuid::new_v4(),
            active: Arc::new(AtomicBool::new(true)),
            registration: Arc::new(Mutex::new(Registration::Pending)),
        }
    }

    /// Replace the pending slot with a registration that completed synchronously.
    fn settled(self, registration: Registration) -> Self {
        Self {
            registration: Arc::new(Mutex::new(registration)),
            ..self
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Whether the listener still receives events
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop delivery and remove the platform listener.
    ///
    /// Idempotent and infallible. When the native registration has not
    /// resolved yet, the listener is removed as soon as it does.
    pub async fn unsubscribe(&self) {
        self.active.store(false, Ordering::SeqCst);

        let registration = {
            let mut slot = self.registration.lock().await;
            std::mem::replace(&mut *slot, Registration::Released)
        };

        match registration {
            Registration::Pending => {
                debug!(subscription = %self.id, "Unsubscribed before native registration resolved");
            }
            Registration::Native(handle) => match handle.remove().await {
                Ok(()) => debug!(subscription = %self.id, "Native network listener removed"),
                Err(error) => {
                    warn!(subscription = %self.id, error = %error, "Failed to remove native network listener")
                }
            },
            Registration::Browser { connectivity, ids } => {
                for id in ids {
                    if let Err(error) = connectivity.remove_listener(id) {
                        warn!(subscription = %self.id, error = %error, "Failed to detach browser network listener");
                    }
                }
                debug!(subscription = %self.id, "Browser network listeners detached");
            }
            Registration::Released => {}
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
