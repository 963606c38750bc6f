//! WebAssembly Bridge Implementations
//!
//! This crate provides browser implementations of the web-side bridge traits
//! defined in `bridge-traits`, using `web-sys` and `wasm-bindgen`.
//!
//! # Platform Support
//!
//! This crate is designed exclusively for the `wasm32-unknown-unknown` target.
//! It will not compile for native targets.
//!
//! # Implementations
//!
//! - `LocalStorageBackend`: namespaced `window.localStorage`
//! - `NavigatorConnectivity`: `navigator.onLine` plus `online`/`offline` window events
//!
//! # Examples
//!
//! ```ignore
//! use bridge_wasm::{build_wasm_bridges, WasmBridgeConfig};
//! use core_runtime::config::CapabilityConfig;
//! use bridge_traits::PlatformKind;
//!
//! let bridges = build_wasm_bridges(WasmBridgeConfig::new("my-app"))?;
//! let config = CapabilityConfig::builder()
//!     .platform(PlatformKind::Web)
//!     .browser_storage(bridges.storage())
//!     .browser_connectivity(bridges.connectivity())
//!     .build()?;
//! ```

#![cfg(target_arch = "wasm32")]
#![warn(missing_docs)]

pub mod bootstrap;
pub mod error;
pub mod network;
pub mod storage;

// Re-export commonly used types
pub use bootstrap::{build_wasm_bridges, WasmBridgeConfig, WasmBridgeSet};
pub use error::{WasmError, WasmResult};
pub use network::NavigatorConnectivity;
pub use storage::LocalStorageBackend;
