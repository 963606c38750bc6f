//! # Storage Adapter
//!
//! Key/value persistence over the platform's store:
//!
//! - **iOS / Android**: the native preference store (`NativePreferences`)
//! - **Web**: browser local storage (`BrowserStorage`)
//!
//! ## Failure policy
//!
//! Backend faults never reach the caller. Reads collapse to `None`, writes to
//! `false`, listings to an empty `Vec`, and a warning naming the operation and
//! the key is emitted. Values are never logged. Callers that need to tell a
//! missing key from a broken store use [`StorageAdapter::lookup`].
//!
//! The adapter holds no cache; every call goes to the backend.

use crate::outcome::Outcome;
use crate::platform::PlatformDetector;
use bridge_traits::{BrowserStorage, BridgeError, NativePreferences};
use core_runtime::{config::CapabilityConfig, Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

#[derive(Clone)]
enum StorageBackend {
    Native(Arc<dyn NativePreferences>),
    Browser(Arc<dyn BrowserStorage>),
}

/// Platform-independent key/value store
#[derive(Clone)]
pub struct StorageAdapter {
    platform: PlatformDetector,
    backend: StorageBackend,
    token_key: String,
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match self.backend {
            StorageBackend::Native(_) => "native",
            StorageBackend::Browser(_) => "browser",
        };
        f.debug_struct("StorageAdapter")
            .field("platform", &self.platform.kind())
            .field("backend", &backend)
            .field("token_key", &self.token_key)
            .finish()
    }
}

impl StorageAdapter {
    /// Build the adapter for the configured platform.
    ///
    /// # Errors
    ///
    /// `CapabilityMissing` if the bridge the platform needs is absent.
    pub fn from_config(config: &CapabilityConfig) -> Result<Self> {
        let platform = PlatformDetector::from_config(config);
        let backend = if platform.is_native() {
            let store = config.native_preferences.clone().ok_or_else(|| {
                Error::missing(
                    "NativePreferences",
                    format!("storage on {} needs a native preference store", platform.kind()),
                )
            })?;
            StorageBackend::Native(store)
        } else {
            let storage = config.browser_storage.clone().ok_or_else(|| {
                Error::missing("BrowserStorage", "storage on web needs browser storage")
            })?;
            StorageBackend::Browser(storage)
        };

        Ok(Self {
            platform,
            backend,
            token_key: config.storage.token_key.clone(),
        })
    }

    pub fn platform(&self) -> PlatformDetector {
        self.platform
    }

    /// Reserved key used by the token helpers
    pub fn token_key(&self) -> &str {
        &self.token_key
    }

    /// Read a value, keeping absence and faults apart.
    pub async fn lookup(&self, key: &str) -> Outcome<String> {
        match &self.backend {
            StorageBackend::Native(store) => store.get(key).await.into(),
            StorageBackend::Browser(storage) => storage.get_item(key).into(),
        }
    }

    /// Read a value. Missing keys and backend faults both yield `None`.
    #[instrument(skip(self), level = "debug")]
    pub async fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).await.collapse("get", key)
    }

    /// Write a value, overwriting any previous one.
    #[instrument(skip(self, value), level = "debug")]
    pub async fn set(&self, key: &str, value: &str) -> bool {
        let result = match &self.backend {
            StorageBackend::Native(store) => store.set(key, value).await,
            StorageBackend::Browser(storage) => storage.set_item(key, value),
        };
        succeeded("set", key, result)
    }

    /// Delete a value. Removing a missing key succeeds.
    #[instrument(skip(self), level = "debug")]
    pub async fn remove(&self, key: &str) -> bool {
        let result = match &self.backend {
            StorageBackend::Native(store) => store.remove(key).await,
            StorageBackend::Browser(storage) => storage.remove_item(key),
        };
        succeeded("remove", key, result)
    }

    /// Delete every entry in the backend's namespace.
    #[instrument(skip(self), level = "debug")]
    pub async fn clear(&self) -> bool {
        let result = match &self.backend {
            StorageBackend::Native(store) => store.clear().await,
            StorageBackend::Browser(storage) => storage.clear(),
        };
        succeeded("clear", "*", result)
    }

    /// All stored keys, in backend order.
    #[instrument(skip(self), level = "debug")]
    pub async fn keys(&self) -> Vec<String> {
        let result = match &self.backend {
            StorageBackend::Native(store) => store.keys().await,
            StorageBackend::Browser(storage) => storage.keys(),
        };
        Outcome::from(result.map(Some))
            .collapse("keys", "*")
            .unwrap_or_default()
    }

    pub async fn get_token(&self) -> Option<String> {
        self.get(&self.token_key).await
    }

    pub async fn set_token(&self, token: &str) -> bool {
        self.set(&self.token_key, token).await
    }

    pub async fn remove_token(&self) -> bool {
        self.remove(&self.token_key).await
    }

    /// Read and decode a JSON value.
    ///
    /// Payloads that do not decode as `T` are reported and treated as absent.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key)
            .await
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(value) => Outcome::Value(value),
                Err(e) => Outcome::Failed(BridgeError::Decode(format!(
                    "stored value is not valid JSON for the requested type: {e}"
                ))),
            })
            .collapse("get_json", key)
    }

    /// Encode `value` as JSON and store it.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(encoded) => self.set(key, &encoded).await,
            Err(e) => {
                warn!(operation = "set_json", key, error = %e, "Failed to encode value");
                false
            }
        }
    }
}

fn succeeded(operation: &'static str, key: &str, result: bridge_traits::error::Result<()>) -> bool {
    match result {
        Ok(()) => {
            debug!(operation, key, "Storage call succeeded");
            true
        }
        Err(error) => {
            warn!(operation, key, error = %error, "Storage call failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_headless::{MemoryBrowserStorage, MemoryPreferences};
    use bridge_traits::PlatformKind;
    use mockall::mock;
    use serde::Deserialize;

    mock! {
        pub Preferences {}

        #[async_trait]
        impl NativePreferences for Preferences {
            async fn get(&self, key: &str) -> bridge_traits::error::Result<Option<String>>;
            async fn set(&self, key: &str, value: &str) -> bridge_traits::error::Result<()>;
            async fn remove(&self, key: &str) -> bridge_traits::error::Result<()>;
            async fn clear(&self) -> bridge_traits::error::Result<()>;
            async fn keys(&self) -> bridge_traits::error::Result<Vec<String>>;
        }
    }

    fn web_adapter() -> StorageAdapter {
        let config = CapabilityConfig::builder()
            .platform(PlatformKind::Web)
            .browser_storage(Arc::new(MemoryBrowserStorage::new()))
            .browser_connectivity(Arc::new(bridge_headless::SimulatedBrowserConnectivity::new(
                true,
            )))
            .build()
            .unwrap();
        StorageAdapter::from_config(&config).unwrap()
    }

    fn native_adapter(store: Arc<dyn NativePreferences>) -> StorageAdapter {
        let config = CapabilityConfig::builder()
            .platform(PlatformKind::Android)
            .native_preferences(store)
            .native_connectivity(Arc::new(bridge_headless::SimulatedNativeConnectivity::new(
                bridge_traits::NetworkStatus::offline(),
            )))
            .native_camera(Arc::new(bridge_headless::FixtureCamera::new()))
            .build()
            .unwrap();
        StorageAdapter::from_config(&config).unwrap()
    }

    fn broken_store() -> MockPreferences {
        let mut store = MockPreferences::new();
        store
            .expect_get()
            .returning(|_| Err(BridgeError::OperationFailed("store locked".into())));
        store
            .expect_set()
            .returning(|_, _| Err(BridgeError::OperationFailed("store locked".into())));
        store
            .expect_remove()
            .returning(|_| Err(BridgeError::OperationFailed("store locked".into())));
        store
            .expect_clear()
            .returning(|| Err(BridgeError::OperationFailed("store locked".into())));
        store
            .expect_keys()
            .returning(|| Err(BridgeError::OperationFailed("store locked".into())));
        store
    }

    #[tokio::test]
    async fn test_web_set_get_remove() {
        let storage = web_adapter();

        assert!(storage.set("theme", "dark").await);
        assert_eq!(storage.get("theme").await, Some("dark".to_string()));

        assert!(storage.remove("theme").await);
        assert_eq!(storage.get("theme").await, None);
        assert!(storage.remove("theme").await);
    }

    #[tokio::test]
    async fn test_web_clear_empties_keys() {
        let storage = web_adapter();
        storage.set("a", "1").await;
        storage.set("b", "2").await;

        assert!(storage.clear().await);
        assert!(storage.keys().await.is_empty());
    }

    #[tokio::test]
    async fn test_native_delegates_to_preferences() {
        let prefs = Arc::new(MemoryPreferences::new());
        let storage = native_adapter(prefs.clone());

        assert!(storage.set("locale", "fr").await);
        assert_eq!(prefs.get("locale").await.unwrap(), Some("fr".to_string()));
        assert_eq!(storage.keys().await, vec!["locale"]);
    }

    #[tokio::test]
    async fn test_token_helpers_use_reserved_key() {
        let storage = web_adapter();
        assert_eq!(storage.token_key(), "auth_token");

        assert!(storage.set_token("abc").await);
        assert_eq!(storage.get("auth_token").await, Some("abc".to_string()));
        assert_eq!(storage.get_token().await, Some("abc".to_string()));

        assert!(storage.remove_token().await);
        assert_eq!(storage.get_token().await, None);
    }

    #[tokio::test]
    async fn test_native_faults_collapse() {
        let storage = native_adapter(Arc::new(broken_store()));

        assert_eq!(storage.get("k").await, None);
        assert!(!storage.set("k", "v").await);
        assert!(!storage.remove("k").await);
        assert!(!storage.clear().await);
        assert!(storage.keys().await.is_empty());
        assert_eq!(storage.get_token().await, None);
    }

    #[tokio::test]
    async fn test_lookup_distinguishes_absent_from_failed() {
        let healthy = web_adapter();
        assert!(healthy.lookup("missing").await.is_absent());

        let broken = native_adapter(Arc::new(broken_store()));
        let outcome = broken.lookup("k").await;
        assert!(matches!(outcome, Outcome::Failed(BridgeError::OperationFailed(_))));
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Profile {
        name: String,
        visits: u32,
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let storage = web_adapter();
        let profile = Profile {
            name: "ada".to_string(),
            visits: 3,
        };

        assert!(storage.set_json("profile", &profile).await);
        assert_eq!(storage.get_json::<Profile>("profile").await, Some(profile));

        storage.set("profile", "{not json").await;
        assert_eq!(storage.get_json::<Profile>("profile").await, None);
        assert!(storage.lookup("profile").await.is_value());
    }

    #[test]
    fn test_missing_bridge_is_reported() {
        let mut config = CapabilityConfig::builder()
            .platform(PlatformKind::Web)
            .browser_storage(Arc::new(MemoryBrowserStorage::new()))
            .browser_connectivity(Arc::new(bridge_headless::SimulatedBrowserConnectivity::new(
                true,
            )))
            .build()
            .unwrap();
        config.browser_storage = None;

        let err = StorageAdapter::from_config(&config).unwrap_err();
        assert!(matches!(err, Error::CapabilityMissing { ref capability, .. } if capability == "BrowserStorage"));
    }
}
