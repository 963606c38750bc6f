//! Device capability façade and bootstrap helpers.
//!
//! This crate wires host-provided bridges into the three capability adapters
//! and hands the application one [`DeviceCapabilities`] value. Native shells
//! build a [`CapabilityConfig`] with their own bridges; WebAssembly builds
//! enable the `wasm` feature and use [`bootstrap_wasm`]; desktop shells and
//! tests enable `headless-shims` (the default) and use [`bootstrap_headless`].

pub mod error;

pub use error::{Result, ServiceError};

pub use bridge_traits::{
    CameraPermissions, ConnectionType, NetworkStatus, PermissionState, PlatformKind,
};
pub use core_capabilities::{
    CameraCapture, CapturedImage, NetworkObserver, Outcome, PlatformDetector, StatusListener,
    StorageAdapter, Subscription,
};
pub use core_runtime::config::{
    CameraSettings, CapabilityConfig, CapabilityConfigBuilder, StorageSettings,
};
pub use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};

use tracing::info;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub use bridge_wasm::WasmBridgeConfig;

/// Primary façade exposed to applications.
///
/// Cloning is cheap; clones share the same bridges.
#[derive(Clone, Debug)]
pub struct DeviceCapabilities {
    platform: PlatformDetector,
    storage: StorageAdapter,
    network: NetworkObserver,
    camera: CameraCapture,
}

impl DeviceCapabilities {
    /// Build every adapter from a validated configuration.
    pub fn new(config: CapabilityConfig) -> Result<Self> {
        config.validate()?;

        let capabilities = Self {
            platform: PlatformDetector::from_config(&config),
            storage: StorageAdapter::from_config(&config)?,
            network: NetworkObserver::from_config(&config)?,
            camera: CameraCapture::from_config(&config)?,
        };

        info!(platform = %config.platform, "Device capabilities ready");
        Ok(capabilities)
    }

    pub fn platform(&self) -> PlatformDetector {
        self.platform
    }

    pub fn storage(&self) -> &StorageAdapter {
        &self.storage
    }

    pub fn network(&self) -> &NetworkObserver {
        &self.network
    }

    pub fn camera(&self) -> &CameraCapture {
        &self.camera
    }
}

/// Convenience bootstrapper for WebAssembly hosts.
///
/// ```ignore
/// use core_service::{bootstrap_wasm, WasmBridgeConfig};
///
/// let capabilities = bootstrap_wasm(WasmBridgeConfig::new("my-app-namespace"))?;
/// let online = capabilities.network().is_connected().await;
/// ```
#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub fn bootstrap_wasm(config: WasmBridgeConfig) -> Result<DeviceCapabilities> {
    let bridges = bridge_wasm::build_wasm_bridges(config)
        .map_err(|err| ServiceError::InitializationFailed(err.to_string()))?;

    let config = CapabilityConfig::builder()
        .platform(PlatformKind::Web)
        .browser_storage(bridges.storage())
        .browser_connectivity(bridges.connectivity())
        .build()?;

    DeviceCapabilities::new(config)
}

/// Bootstrapper for hosts without a device shell.
///
/// Every bridge the platform needs is simulated in process. On native
/// platforms, `preferences_path` persists the preference store as a JSON
/// file; without it (and always on web) storage lives in memory.
#[cfg(all(feature = "headless-shims", not(target_arch = "wasm32")))]
pub async fn bootstrap_headless(
    platform: PlatformKind,
    preferences_path: Option<std::path::PathBuf>,
) -> Result<DeviceCapabilities> {
    let mut builder = CapabilityConfig::builder().platform(platform);

    if let (true, Some(path)) = (platform.is_native(), preferences_path) {
        let preferences = bridge_headless::JsonFilePreferences::open(path).await?;
        builder = builder.native_preferences(std::sync::Arc::new(preferences));
    }

    DeviceCapabilities::new(builder.build()?)
}
