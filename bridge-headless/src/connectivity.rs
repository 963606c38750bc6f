//! Native connectivity monitor simulation

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    network::{NativeConnectivity, NativeListenerHandle, NetworkStatus, StatusCallback},
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

use crate::lock;

struct MonitorState {
    status: Mutex<NetworkStatus>,
    listeners: Mutex<BTreeMap<u64, StatusCallback>>,
    next_id: AtomicU64,
    removed: AtomicUsize,
    fail_status: AtomicBool,
    fail_next_registration: AtomicBool,
}

/// Scriptable stand-in for `NWPathMonitor` / `ConnectivityManager`
///
/// Registration can be held open with [`hold_registrations`](Self::hold_registrations)
/// to reproduce a device bridge that answers slowly; pending
/// `add_status_listener` calls resolve once
/// [`release_registrations`](Self::release_registrations) is called.
pub struct SimulatedNativeConnectivity {
    state: Arc<MonitorState>,
    gate: watch::Sender<bool>,
}

impl SimulatedNativeConnectivity {
    pub fn new(status: NetworkStatus) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Arc::new(MonitorState {
                status: Mutex::new(status),
                listeners: Mutex::new(BTreeMap::new()),
                next_id: AtomicU64::new(1),
                removed: AtomicUsize::new(0),
                fail_status: AtomicBool::new(false),
                fail_next_registration: AtomicBool::new(false),
            }),
            gate,
        }
    }

    /// Update the current status and deliver it to every listener in
    /// registration order.
    pub fn emit(&self, status: NetworkStatus) {
        *lock(&self.state.status) = status;

        let callbacks: Vec<StatusCallback> =
            lock(&self.state.listeners).values().cloned().collect();
        debug!(
            connected = status.connected,
            connection_type = %status.connection_type,
            listeners = callbacks.len(),
            "Emitting native network status"
        );

        for callback in callbacks {
            callback(status);
        }
    }

    /// Park every registration until [`release_registrations`](Self::release_registrations).
    pub fn hold_registrations(&self) {
        self.gate.send_replace(false);
    }

    pub fn release_registrations(&self) {
        self.gate.send_replace(true);
    }

    /// Make the next `add_status_listener` call fail.
    pub fn fail_next_registration(&self) {
        self.state
            .fail_next_registration
            .store(true, Ordering::SeqCst);
    }

    /// Make `get_status` fail until switched off again.
    pub fn fail_status_queries(&self, fail: bool) {
        self.state.fail_status.store(fail, Ordering::SeqCst);
    }

    /// Listeners currently registered with the monitor
    pub fn listener_count(&self) -> usize {
        lock(&self.state.listeners).len()
    }

    /// Listeners removed through their handle so far
    pub fn removed_count(&self) -> usize {
        self.state.removed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NativeConnectivity for SimulatedNativeConnectivity {
    async fn get_status(&self) -> Result<NetworkStatus> {
        if self.state.fail_status.load(Ordering::SeqCst) {
            return Err(BridgeError::OperationFailed(
                "network monitor unavailable".to_string(),
            ));
        }
        Ok(*lock(&self.state.status))
    }

    async fn add_status_listener(
        &self,
        callback: StatusCallback,
    ) -> Result<Box<dyn NativeListenerHandle>> {
        let mut gate = self.gate.subscribe();
        gate.wait_for(|open| *open)
            .await
            .map_err(|_| BridgeError::OperationFailed("network monitor shut down".to_string()))?;

        if self
            .state
            .fail_next_registration
            .swap(false, Ordering::SeqCst)
        {
            return Err(BridgeError::OperationFailed(
                "listener registration rejected".to_string(),
            ));
        }

        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        lock(&self.state.listeners).insert(id, callback);
        debug!(listener_id = id, "Registered native status listener");

        Ok(Box::new(SimulatedListenerHandle {
            id,
            state: self.state.clone(),
        }))
    }
}

struct SimulatedListenerHandle {
    id: u64,
    state: Arc<MonitorState>,
}

#[async_trait]
impl NativeListenerHandle for SimulatedListenerHandle {
    async fn remove(self: Box<Self>) -> Result<()> {
        if lock(&self.state.listeners).remove(&self.id).is_some() {
            self.state.removed.fetch_add(1, Ordering::SeqCst);
            debug!(listener_id = self.id, "Removed native status listener");
        }
        Ok(())
    }
}
