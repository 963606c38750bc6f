//! Runtime identification plus helper bounds that keep trait objects aligned
//! with the threading guarantees of each target.
//!
//! Native targets require `Send + Sync` so bridge implementations can be shared
//! across async tasks. WebAssembly builds run on a single thread and cannot
//! satisfy those bounds because browser-provided objects (e.g., `web_sys`
//! handles, JS closures) are not thread-safe. The marker traits below make the
//! bounds conditional without duplicating every trait definition.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The runtime the application is hosted in.
///
/// Exactly one value is active for the lifetime of a process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    /// Native iOS shell
    Ios,
    /// Native Android shell
    Android,
    /// Ordinary browser, or any runtime without a native shell
    Web,
}

impl PlatformKind {
    /// Resolve the platform from the compilation target.
    ///
    /// Anything that is not an iOS or Android build is treated as `Web`: it has
    /// no native device bridge to call into.
    pub const fn detect() -> Self {
        if cfg!(target_os = "ios") {
            PlatformKind::Ios
        } else if cfg!(target_os = "android") {
            PlatformKind::Android
        } else {
            PlatformKind::Web
        }
    }

    pub const fn is_native(self) -> bool {
        matches!(self, PlatformKind::Ios | PlatformKind::Android)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            PlatformKind::Ios => "ios",
            PlatformKind::Android => "android",
            PlatformKind::Web => "web",
        }
    }
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(PlatformKind::Ios),
            "android" => Ok(PlatformKind::Android),
            "web" => Ok(PlatformKind::Web),
            other => Err(format!("unknown platform '{other}'")),
        }
    }
}

/// Marker trait that applies `Send + Sync` on native targets while becoming a
/// no-op on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}

/// Marker trait equivalent to `Send` on native targets.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSend: Send {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSend for T where T: Send {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSend {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSend for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform() {
        assert_eq!("ios".parse::<PlatformKind>(), Ok(PlatformKind::Ios));
        assert_eq!(" Android ".parse::<PlatformKind>(), Ok(PlatformKind::Android));
        assert_eq!("WEB".parse::<PlatformKind>(), Ok(PlatformKind::Web));
        assert!("windows".parse::<PlatformKind>().is_err());
    }

    #[test]
    fn test_native_projection() {
        assert!(PlatformKind::Ios.is_native());
        assert!(PlatformKind::Android.is_native());
        assert!(!PlatformKind::Web.is_native());
    }

    #[test]
    fn test_detect_on_host_target() {
        // Test binaries never run inside a mobile shell.
        assert_eq!(PlatformKind::detect(), PlatformKind::Web);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&PlatformKind::Android).unwrap();
        assert_eq!(json, "\"android\"");
        let back: PlatformKind = serde_json::from_str("\"ios\"").unwrap();
        assert_eq!(back, PlatformKind::Ios);
    }
}
