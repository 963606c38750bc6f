//! # Capability Configuration Module
//!
//! Provides configuration management for the device capability core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `CapabilityConfig` holding the active [`PlatformKind`], the bridges the
//! capability adapters call into, and the fixed settings for storage and
//! capture. The platform is resolved once here and injected everywhere else,
//! so tests can pick any platform without touching global state.
//!
//! ## Required Bridges
//!
//! | Platform      | Required |
//! |---------------|----------|
//! | iOS / Android | `NativePreferences`, `NativeConnectivity`, `NativeCamera` |
//! | Web           | `BrowserStorage`, `BrowserConnectivity` |
//!
//! When the `headless-shims` feature is enabled, in-process defaults from
//! `bridge-headless` are injected for any required bridge that was not
//! provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CapabilityConfig;
//! use bridge_traits::PlatformKind;
//! use std::sync::Arc;
//!
//! let config = CapabilityConfig::builder()
//!     .platform(PlatformKind::Web)
//!     .browser_storage(Arc::new(MyLocalStorage))
//!     .browser_connectivity(Arc::new(MyNavigator))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! The builder fails fast with an actionable `CapabilityMissing` error when a
//! bridge required by the selected platform is absent, and with `Config` when a
//! setting is out of range.

use crate::error::{Error, Result};
use bridge_traits::{
    BrowserConnectivity, BrowserStorage, Clock, NativeCamera, NativeConnectivity,
    ImageFormat, NativePreferences, PhotoRequest, PhotoSource, PlatformKind, SystemClock,
};
use std::sync::Arc;

/// Key under which the authentication token is stored.
pub const DEFAULT_TOKEN_KEY: &str = "auth_token";

/// Default JPEG compression quality for captures.
pub const DEFAULT_PHOTO_QUALITY: u8 = 90;

/// Settings for the storage adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Reserved key used by the token helpers
    pub token_key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            token_key: DEFAULT_TOKEN_KEY.to_string(),
        }
    }
}

impl StorageSettings {
    pub fn with_token_key(mut self, key: impl Into<String>) -> Self {
        self.token_key = key.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.token_key.trim().is_empty() {
            return Err(Error::Config("Token key cannot be empty".to_string()));
        }
        Ok(())
    }
}

/// Fixed capture configuration used for every photo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSettings {
    /// Compression quality, 1..=100
    pub quality: u8,
    pub allow_editing: bool,
    pub correct_orientation: bool,
    pub save_to_gallery: bool,
    pub preferred_format: ImageFormat,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            quality: DEFAULT_PHOTO_QUALITY,
            allow_editing: false,
            correct_orientation: true,
            save_to_gallery: false,
            preferred_format: ImageFormat::Jpeg,
        }
    }
}

impl CameraSettings {
    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Build the bridge request for the given source.
    pub fn request(&self, source: PhotoSource) -> PhotoRequest {
        PhotoRequest {
            source,
            quality: self.quality,
            allow_editing: self.allow_editing,
            correct_orientation: self.correct_orientation,
            save_to_gallery: self.save_to_gallery,
            preferred_format: self.preferred_format,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 || self.quality > 100 {
            return Err(Error::Config(format!(
                "Photo quality must be between 1 and 100, got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Configuration for the device capability core.
///
/// Use [`CapabilityConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CapabilityConfig {
    /// Runtime the process is hosted in
    pub platform: PlatformKind,

    /// Native preference store (required on iOS/Android)
    pub native_preferences: Option<Arc<dyn NativePreferences>>,

    /// Native connectivity monitor (required on iOS/Android)
    pub native_connectivity: Option<Arc<dyn NativeConnectivity>>,

    /// Native camera bridge (required on iOS/Android)
    pub native_camera: Option<Arc<dyn NativeCamera>>,

    /// Browser storage (required on web)
    pub browser_storage: Option<Arc<dyn BrowserStorage>>,

    /// Browser connectivity (required on web)
    pub browser_connectivity: Option<Arc<dyn BrowserConnectivity>>,

    /// Time source for capture file names
    pub clock: Arc<dyn Clock>,

    pub storage: StorageSettings,

    pub camera: CameraSettings,
}

impl std::fmt::Debug for CapabilityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityConfig")
            .field("platform", &self.platform)
            .field(
                "native_preferences",
                &self
                    .native_preferences
                    .as_ref()
                    .map(|_| "NativePreferences { ... }"),
            )
            .field(
                "native_connectivity",
                &self
                    .native_connectivity
                    .as_ref()
                    .map(|_| "NativeConnectivity { ... }"),
            )
            .field(
                "native_camera",
                &self.native_camera.as_ref().map(|_| "NativeCamera { ... }"),
            )
            .field(
                "browser_storage",
                &self.browser_storage.as_ref().map(|_| "BrowserStorage { ... }"),
            )
            .field(
                "browser_connectivity",
                &self
                    .browser_connectivity
                    .as_ref()
                    .map(|_| "BrowserConnectivity { ... }"),
            )
            .field("storage", &self.storage)
            .field("camera", &self.camera)
            .finish()
    }
}

impl CapabilityConfig {
    /// Creates a new builder for constructing a `CapabilityConfig`.
    pub fn builder() -> CapabilityConfigBuilder {
        CapabilityConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - Every bridge required by `platform` is present
    /// - Storage and camera settings are in range
    pub fn validate(&self) -> Result<()> {
        if self.platform.is_native() {
            if self.native_preferences.is_none() {
                return Err(native_bridge_missing(self.platform, "NativePreferences"));
            }
            if self.native_connectivity.is_none() {
                return Err(native_bridge_missing(self.platform, "NativeConnectivity"));
            }
            if self.native_camera.is_none() {
                return Err(native_bridge_missing(self.platform, "NativeCamera"));
            }
        } else {
            if self.browser_storage.is_none() {
                return Err(browser_bridge_missing("BrowserStorage"));
            }
            if self.browser_connectivity.is_none() {
                return Err(browser_bridge_missing("BrowserConnectivity"));
            }
        }

        self.storage.validate()?;
        self.camera.validate()?;

        Ok(())
    }
}

fn native_bridge_missing(platform: PlatformKind, capability: &str) -> Error {
    Error::missing(
        capability,
        format!(
            "{capability} implementation is required on {platform}. \
             Inject the shell's bridge adapter, or enable the 'headless-shims' \
             feature to fall back to bridge-headless simulations."
        ),
    )
}

fn browser_bridge_missing(capability: &str) -> Error {
    Error::missing(
        capability,
        format!(
            "{capability} implementation is required on web. \
             wasm32: use bridge_wasm::build_wasm_bridges. \
             Other targets: enable the 'headless-shims' feature."
        ),
    )
}

#[cfg(all(feature = "headless-shims", not(target_arch = "wasm32")))]
mod shims {
    use super::*;
    use bridge_headless::{
        FixtureCamera, MemoryBrowserStorage, MemoryPreferences, SimulatedBrowserConnectivity,
        SimulatedNativeConnectivity,
    };
    use bridge_traits::NetworkStatus;

    pub(super) fn native_preferences(_: PlatformKind) -> Result<Arc<dyn NativePreferences>> {
        Ok(Arc::new(MemoryPreferences::new()))
    }

    pub(super) fn native_connectivity(_: PlatformKind) -> Result<Arc<dyn NativeConnectivity>> {
        Ok(Arc::new(SimulatedNativeConnectivity::new(
            NetworkStatus::browser_online(),
        )))
    }

    pub(super) fn native_camera(_: PlatformKind) -> Result<Arc<dyn NativeCamera>> {
        Ok(Arc::new(FixtureCamera::new()))
    }

    pub(super) fn browser_storage() -> Result<Arc<dyn BrowserStorage>> {
        Ok(Arc::new(MemoryBrowserStorage::new()))
    }

    pub(super) fn browser_connectivity() -> Result<Arc<dyn BrowserConnectivity>> {
        Ok(Arc::new(SimulatedBrowserConnectivity::new(true)))
    }
}

#[cfg(any(not(feature = "headless-shims"), target_arch = "wasm32"))]
mod shims {
    use super::*;

    pub(super) fn native_preferences(platform: PlatformKind) -> Result<Arc<dyn NativePreferences>> {
        Err(native_bridge_missing(platform, "NativePreferences"))
    }

    pub(super) fn native_connectivity(
        platform: PlatformKind,
    ) -> Result<Arc<dyn NativeConnectivity>> {
        Err(native_bridge_missing(platform, "NativeConnectivity"))
    }

    pub(super) fn native_camera(platform: PlatformKind) -> Result<Arc<dyn NativeCamera>> {
        Err(native_bridge_missing(platform, "NativeCamera"))
    }

    pub(super) fn browser_storage() -> Result<Arc<dyn BrowserStorage>> {
        Err(browser_bridge_missing("BrowserStorage"))
    }

    pub(super) fn browser_connectivity() -> Result<Arc<dyn BrowserConnectivity>> {
        Err(browser_bridge_missing("BrowserConnectivity"))
    }
}

/// Builder for constructing [`CapabilityConfig`] instances.
///
/// Call [`build()`](CapabilityConfigBuilder::build) once every bridge for the
/// target platform has been provided.
#[derive(Default)]
pub struct CapabilityConfigBuilder {
    platform: Option<PlatformKind>,
    native_preferences: Option<Arc<dyn NativePreferences>>,
    native_connectivity: Option<Arc<dyn NativeConnectivity>>,
    native_camera: Option<Arc<dyn NativeCamera>>,
    browser_storage: Option<Arc<dyn BrowserStorage>>,
    browser_connectivity: Option<Arc<dyn BrowserConnectivity>>,
    clock: Option<Arc<dyn Clock>>,
    storage: Option<StorageSettings>,
    camera: Option<CameraSettings>,
}

impl CapabilityConfigBuilder {
    /// Sets the platform explicitly.
    ///
    /// Defaults to [`PlatformKind::detect`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bridge_traits::PlatformKind;
    /// use core_runtime::config::CapabilityConfig;
    ///
    /// let builder = CapabilityConfig::builder().platform(PlatformKind::Android);
    /// ```
    pub fn platform(mut self, platform: PlatformKind) -> Self {
        self.platform = Some(platform);
        self
    }

    /// Sets the native preference store.
    pub fn native_preferences(mut self, store: Arc<dyn NativePreferences>) -> Self {
        self.native_preferences = Some(store);
        self
    }

    /// Sets the native connectivity monitor.
    pub fn native_connectivity(mut self, monitor: Arc<dyn NativeConnectivity>) -> Self {
        self.native_connectivity = Some(monitor);
        self
    }

    /// Sets the native camera bridge.
    pub fn native_camera(mut self, camera: Arc<dyn NativeCamera>) -> Self {
        self.native_camera = Some(camera);
        self
    }

    /// Sets the browser storage backend.
    pub fn browser_storage(mut self, storage: Arc<dyn BrowserStorage>) -> Self {
        self.browser_storage = Some(storage);
        self
    }

    /// Sets the browser connectivity source.
    pub fn browser_connectivity(mut self, connectivity: Arc<dyn BrowserConnectivity>) -> Self {
        self.browser_connectivity = Some(connectivity);
        self
    }

    /// Sets the time source. Defaults to [`SystemClock`].
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Overrides the storage settings.
    pub fn storage_settings(mut self, settings: StorageSettings) -> Self {
        self.storage = Some(settings);
        self
    }

    /// Overrides the reserved token key.
    pub fn token_key(mut self, key: impl Into<String>) -> Self {
        let settings = self.storage.take().unwrap_or_default();
        self.storage = Some(settings.with_token_key(key));
        self
    }

    /// Overrides the capture settings.
    pub fn camera_settings(mut self, settings: CameraSettings) -> Self {
        self.camera = Some(settings);
        self
    }

    /// Builds the final configuration.
    ///
    /// # Errors
    ///
    /// Returns `CapabilityMissing` if a bridge required by the platform is
    /// absent (and no headless default is available), or `Config` if a setting
    /// is invalid.
    pub fn build(self) -> Result<CapabilityConfig> {
        let platform = self.platform.unwrap_or_else(PlatformKind::detect);

        let mut native_preferences = self.native_preferences;
        let mut native_connectivity = self.native_connectivity;
        let mut native_camera = self.native_camera;
        let mut browser_storage = self.browser_storage;
        let mut browser_connectivity = self.browser_connectivity;

        if platform.is_native() {
            if native_preferences.is_none() {
                native_preferences = Some(shims::native_preferences(platform)?);
            }
            if native_connectivity.is_none() {
                native_connectivity = Some(shims::native_connectivity(platform)?);
            }
            if native_camera.is_none() {
                native_camera = Some(shims::native_camera(platform)?);
            }
        } else {
            if browser_storage.is_none() {
                browser_storage = Some(shims::browser_storage()?);
            }
            if browser_connectivity.is_none() {
                browser_connectivity = Some(shims::browser_connectivity()?);
            }
        }

        let config = CapabilityConfig {
            platform,
            native_preferences,
            native_connectivity,
            native_camera,
            browser_storage,
            browser_connectivity,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            storage: self.storage.unwrap_or_default(),
            camera: self.camera.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
