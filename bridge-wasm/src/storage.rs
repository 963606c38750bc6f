//! `localStorage` implementation of the browser storage bridge.
//!
//! Keys are namespaced as `<namespace>::storage::<key>` so several
//! applications (or several instances of one) can share an origin. `keys()`
//! and `clear()` only see entries under the namespace.

use bridge_traits::{error::Result as BridgeResult, storage::BrowserStorage, BridgeError};

use crate::error::js_error;

const STORAGE_PREFIX: &str = "storage";

pub(crate) fn local_storage() -> BridgeResult<web_sys::Storage> {
    let window = web_sys::window().ok_or_else(|| BridgeError::NotAvailable("window".into()))?;
    window
        .local_storage()
        .map_err(|err| js_error("localStorage", err))?
        .ok_or_else(|| BridgeError::NotAvailable("localStorage".into()))
}

#[derive(Clone)]
/// Browser storage backed by `window.localStorage`.
pub struct LocalStorageBackend {
    storage: web_sys::Storage,
    prefix: String,
}

impl LocalStorageBackend {
    /// Construct a backend scoped to the provided namespace.
    pub fn new(namespace: impl AsRef<str>) -> BridgeResult<Self> {
        Ok(Self {
            storage: local_storage()?,
            prefix: format!("{}::{STORAGE_PREFIX}::", namespace.as_ref()),
        })
    }

    /// Prefix every key of this backend is stored under.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn key_for(&self, key: &str) -> String {
        format!("{}{key}", self.prefix)
    }
}

impl BrowserStorage for LocalStorageBackend {
    fn get_item(&self, key: &str) -> BridgeResult<Option<String>> {
        self.storage
            .get_item(&self.key_for(key))
            .map_err(|err| js_error("get_item", err))
    }

    fn set_item(&self, key: &str, value: &str) -> BridgeResult<()> {
        // Throws QuotaExceededError when the origin's quota is used up.
        self.storage
            .set_item(&self.key_for(key), value)
            .map_err(|err| js_error("set_item", err))
    }

    fn remove_item(&self, key: &str) -> BridgeResult<()> {
        self.storage
            .remove_item(&self.key_for(key))
            .map_err(|err| js_error("remove_item", err))
    }

    fn clear(&self) -> BridgeResult<()> {
        for key in self.keys()? {
            self.storage
                .remove_item(&self.key_for(&key))
                .map_err(|err| js_error("clear", err))?;
        }
        Ok(())
    }

    fn keys(&self) -> BridgeResult<Vec<String>> {
        let len = self
            .storage
            .length()
            .map_err(|err| js_error("storage length", err))?;
        let mut keys = Vec::new();
        for idx in 0..len {
            if let Some(entry) = self
                .storage
                .key(idx)
                .map_err(|err| js_error("storage key", err))?
            {
                if let Some(key) = entry.strip_prefix(&self.prefix) {
                    keys.push(key.to_string());
                }
            }
        }
        Ok(keys)
    }
}
