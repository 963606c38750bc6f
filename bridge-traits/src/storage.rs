//! Key/Value Storage Abstractions
//!
//! Two backends can hold the application's string entries: the native shell's
//! preference store, reached asynchronously over the device bridge, and the
//! browser's `localStorage`, which is synchronous.

use crate::{error::Result, platform::PlatformSendSync};

/// Native preference store trait
///
/// Abstracts the shell's key/value preferences:
/// - iOS: UserDefaults
/// - Android: SharedPreferences
///
/// # Contract
///
/// - `get` is total: a missing key is `Ok(None)`, never an error
/// - `set` overwrites silently
/// - `remove` of a missing key succeeds
/// - `clear` and `keys` are scoped to the store's own group/namespace
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::NativePreferences;
///
/// async fn remember_theme(prefs: &dyn NativePreferences) -> Result<()> {
///     prefs.set("theme", "dark").await?;
///     Ok(())
/// }
/// ```
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait NativePreferences: PlatformSendSync {
    /// Read a value
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value if present
    async fn remove(&self, key: &str) -> Result<()>;

    /// Delete every value in the store's group
    async fn clear(&self) -> Result<()>;

    /// List every stored key. Order is store-defined.
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Browser storage trait
///
/// Mirrors the synchronous Web Storage API (`window.localStorage`).
/// Implementations are expected to scope keys to a namespace so that `clear`
/// and `keys` only see the application's own entries.
pub trait BrowserStorage: PlatformSendSync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;

    fn keys(&self) -> Result<Vec<String>>;
}
