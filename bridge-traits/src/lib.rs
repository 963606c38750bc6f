//! # Host Bridge Traits
//!
//! Contracts between the capability core and whatever actually talks to the
//! device: a native mobile shell, the browser, or a headless simulation.
//!
//! ## Overview
//!
//! The core never touches a device API directly. It decides *which* backend to
//! call and normalises the result, and every backend it may call is described
//! by one of the traits below. Hosts provide concrete implementations and
//! inject them through `core_runtime::config::CapabilityConfig`.
//!
//! ## Traits
//!
//! ### Native shell
//! - [`NativePreferences`](storage::NativePreferences) - Preference store (UserDefaults / SharedPreferences)
//! - [`NativeConnectivity`](network::NativeConnectivity) - Connectivity monitor with listener handles
//! - [`NativeCamera`](camera::NativeCamera) - Camera, photo library and permission prompts
//!
//! ### Browser
//! - [`BrowserStorage`](storage::BrowserStorage) - Synchronous `localStorage`-style store
//! - [`BrowserConnectivity`](network::BrowserConnectivity) - `navigator.onLine` plus `online`/`offline` events
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for capture timestamps
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Bridges |
//! |----------|---------------------|---------|
//! | iOS      | host shell          | native preferences, connectivity, camera |
//! | Android  | host shell          | native preferences, connectivity, camera |
//! | Web      | `bridge-wasm`       | browser storage, browser connectivity |
//! | Headless | `bridge-headless`   | all of the above, simulated |
//!
//! ## Error Handling
//!
//! All bridge traits report failures through [`BridgeError`](error::BridgeError).
//! Implementations should:
//!
//! - Convert platform exceptions to `BridgeError::OperationFailed`
//! - Report a user-dismissed prompt as `BridgeError::Cancelled`
//! - Never put stored values or tokens into error messages
//!
//! ## Thread Safety
//!
//! Native builds require `Send + Sync` on every bridge so adapters can be shared
//! across async tasks. `wasm32` builds relax those bounds through the helpers in
//! [`platform`], since browser handles are single-threaded.
//!
//! ## Examples
//!
//! ### Implementing NativePreferences
//!
//! ```ignore
//! use bridge_traits::storage::NativePreferences;
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct UserDefaultsPreferences {
//!     suite: String,
//! }
//!
//! #[async_trait]
//! impl NativePreferences for UserDefaultsPreferences {
//!     async fn get(&self, key: &str) -> Result<Option<String>> {
//!         // Call into the shell
//!         todo!()
//!     }
//!     // ...
//! }
//! ```

pub mod camera;
pub mod error;
pub mod network;
pub mod platform;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use camera::{
    CameraPermissions, ImageFormat, NativeCamera, PermissionKind, PermissionState, PhotoRequest, PhotoSource,
    RawPhoto,
};
pub use network::{
    BrowserConnectivity, ConnectionType, ConnectivityEvent, EventCallback, ListenerId,
    NativeConnectivity, NativeListenerHandle, NetworkStatus, StatusCallback,
};
pub use platform::{PlatformKind, PlatformSend, PlatformSendSync};
pub use storage::{BrowserStorage, NativePreferences};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
