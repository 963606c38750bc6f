//! # Headless Bridge Implementations
//!
//! In-process implementations of every bridge trait, for hosts that run the
//! capability core without a device shell: desktop development shells, CI, and
//! the core's own tests.
//!
//! ## Overview
//!
//! - `NativePreferences` using an in-memory map or a JSON file
//! - `BrowserStorage` using an in-memory map
//! - `NativeConnectivity` with scriptable status changes and a registration gate
//! - `BrowserConnectivity` with a togglable online flag
//! - `NativeCamera` returning a fixture image, a cancellation, or a fault
//!
//! Every simulation exposes control methods (`emit`, `set_online`,
//! `hold_registrations`, ...) so callers can drive device events by hand.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_headless::{SimulatedBrowserConnectivity, MemoryBrowserStorage};
//! use std::sync::Arc;
//!
//! let connectivity = Arc::new(SimulatedBrowserConnectivity::new(true));
//! let config = CapabilityConfig::builder()
//!     .platform(PlatformKind::Web)
//!     .browser_storage(Arc::new(MemoryBrowserStorage::new()))
//!     .browser_connectivity(connectivity.clone())
//!     .build()?;
//!
//! connectivity.set_online(false); // fires "offline" listeners
//! ```

#![cfg(not(target_arch = "wasm32"))]

mod browser;
mod camera;
mod connectivity;
mod preferences;

pub use browser::{MemoryBrowserStorage, SimulatedBrowserConnectivity};
pub use camera::{CaptureScript, FixtureCamera};
pub use connectivity::SimulatedNativeConnectivity;
pub use preferences::{JsonFilePreferences, MemoryPreferences};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a std mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
