//! # Device Capability Adapters
//!
//! One application-facing contract per device capability, each branching on
//! the platform the process runs in:
//!
//! | Adapter              | iOS / Android                 | Web |
//! |----------------------|-------------------------------|-----|
//! | [`StorageAdapter`]   | native preference store       | browser local storage |
//! | [`NetworkObserver`]  | native connectivity monitor   | `navigator.onLine` + window events |
//! | [`CameraCapture`]    | native camera / photo library | unavailable (`None`) |
//!
//! All three depend only on [`PlatformDetector`]; none depends on another.
//!
//! ## Error behaviour
//!
//! No capability call returns an error. Absence (missing key, cancelled
//! capture, unsupported platform) and platform faults both collapse to
//! `None`/`false`/empty; faults are additionally reported through `tracing`.
//! [`Outcome`] keeps the three cases apart for callers that need them.
//!
//! ## Usage
//!
//! ```ignore
//! use core_capabilities::{CameraCapture, NetworkObserver, StorageAdapter};
//!
//! let storage = StorageAdapter::from_config(&config)?;
//! storage.set_token("t1").await;
//!
//! let network = NetworkObserver::from_config(&config)?;
//! let subscription = network.on_network_status_change(|status| {
//!     tracing::info!(connected = status.connected, "network changed");
//! });
//! subscription.unsubscribe().await;
//! ```

pub mod camera;
pub mod network;
pub mod outcome;
pub mod platform;
pub mod storage;

mod task;

pub use camera::{CameraCapture, CapturedImage};
pub use network::{NetworkObserver, StatusListener, Subscription};
pub use outcome::Outcome;
pub use platform::PlatformDetector;
pub use storage::StorageAdapter;
