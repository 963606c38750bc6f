//! Runtime platform detection

use bridge_traits::PlatformKind;
use core_runtime::config::CapabilityConfig;
use std::sync::OnceLock;

static DETECTED: OnceLock<PlatformKind> = OnceLock::new();

/// Answers "which runtime am I in?" for the capability adapters.
///
/// The value never changes for the lifetime of a detector, and
/// [`PlatformDetector::current`] returns the same value for the lifetime of
/// the process. Adapters receive their detector from the configuration, so
/// tests can pick any platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformDetector {
    kind: PlatformKind,
}

impl PlatformDetector {
    /// Detector for an explicit platform
    pub const fn new(kind: PlatformKind) -> Self {
        Self { kind }
    }

    /// Detector for the compile target, resolved once per process
    pub fn current() -> Self {
        Self::new(*DETECTED.get_or_init(PlatformKind::detect))
    }

    pub fn from_config(config: &CapabilityConfig) -> Self {
        Self::new(config.platform)
    }

    pub const fn kind(&self) -> PlatformKind {
        self.kind
    }

    pub const fn is_native(&self) -> bool {
        self.kind.is_native()
    }

    pub const fn is_ios(&self) -> bool {
        matches!(self.kind, PlatformKind::Ios)
    }

    pub const fn is_android(&self) -> bool {
        matches!(self.kind, PlatformKind::Android)
    }

    pub const fn is_web(&self) -> bool {
        matches!(self.kind, PlatformKind::Web)
    }
}

impl Default for PlatformDetector {
    fn default() -> Self {
        Self::current()
    }
}
