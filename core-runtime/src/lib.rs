//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the device capability core:
//! - Logging and tracing infrastructure
//! - Configuration management (platform selection and bridge injection)
//!
//! ## Overview
//!
//! Every capability crate depends on this one for its configuration type and
//! for the logging conventions used on the diagnostic side channel. Bridges are
//! injected here once at startup; nothing downstream reads global platform
//! state.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
