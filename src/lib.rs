//! Workspace entry crate.
//!
//! Re-exports `core-service` behind feature flags so host applications can
//! depend on `device-capabilities` alone:
//!
//! - `headless-shims` (default): simulated bridges for desktop shells and CI
//! - `wasm`: browser bridges; build with `--no-default-features --features wasm`

#[cfg(any(feature = "headless-shims", feature = "wasm"))]
pub use core_service::*;
