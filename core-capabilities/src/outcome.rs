//! Typed bridge results
//!
//! Adapters keep "value", "nothing there" and "the bridge failed" apart
//! internally and only collapse them into `Option`/`bool` at the outward
//! boundary, where the failure is logged.

use bridge_traits::error::{BridgeError, Result};
use tracing::warn;

/// Result of a capability call before it is collapsed for the application
#[derive(Debug)]
pub enum Outcome<T> {
    /// The bridge produced a value
    Value(T),
    /// Nothing there: missing key, no image data, unsupported on this platform
    Absent,
    /// The bridge reported a fault
    Failed(BridgeError),
}

impl<T> Outcome<T> {
    pub fn is_value(&self) -> bool {
        matches!(self, Outcome::Value(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Outcome::Absent)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&BridgeError> {
        match self {
            Outcome::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Value(value) => Outcome::Value(f(value)),
            Outcome::Absent => Outcome::Absent,
            Outcome::Failed(error) => Outcome::Failed(error),
        }
    }

    /// Chain a fallible step that may also find nothing.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Outcome<U>) -> Outcome<U> {
        match self {
            Outcome::Value(value) => f(value),
            Outcome::Absent => Outcome::Absent,
            Outcome::Failed(error) => Outcome::Failed(error),
        }
    }

    /// Drop the distinction between absent and failed without logging.
    pub fn into_option(self) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Collapse at the adapter boundary, reporting a fault as a warning.
    ///
    /// Only the operation name and the subject (a storage key, a capture
    /// source) are logged, never the payload.
    pub(crate) fn collapse(self, operation: &'static str, subject: &str) -> Option<T> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Absent => None,
            Outcome::Failed(error) => {
                warn!(operation, subject, error = %error, "Capability call failed");
                None
            }
        }
    }
}

impl<T> From<Result<Option<T>>> for Outcome<T> {
    fn from(result: Result<Option<T>>) -> Self {
        match result {
            Ok(Some(value)) => Outcome::Value(value),
            Ok(None) => Outcome::Absent,
            Err(error) => Outcome::Failed(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bridge_result() {
        let value: Outcome<u8> = Ok(Some(1)).into();
        assert!(value.is_value());
        assert_eq!(value.value(), Some(&1));

        let absent: Outcome<u8> = Ok(None).into();
        assert!(absent.is_absent());

        let failed: Outcome<u8> = Err(BridgeError::OperationFailed("disk full".into())).into();
        assert!(failed.is_failed());
        assert!(failed.error().is_some());
    }

    #[test]
    fn test_collapse() {
        assert_eq!(Outcome::Value("v").collapse("get", "k"), Some("v"));
        assert_eq!(Outcome::<&str>::Absent.collapse("get", "k"), None);
        assert_eq!(
            Outcome::<&str>::Failed(BridgeError::NotAvailable("prefs".into())).collapse("get", "k"),
            None
        );
    }

    #[test]
    fn test_and_then_keeps_failure() {
        let failed: Outcome<String> = Outcome::Failed(BridgeError::Decode("bad".into()));
        let chained = failed.and_then(|s| Outcome::Value(s.len()));
        assert!(chained.is_failed());

        let parsed = Outcome::Value("42".to_string()).and_then(|s| match s.parse::<u32>() {
            Ok(n) => Outcome::Value(n),
            Err(_) => Outcome::Absent,
        });
        assert_eq!(parsed.into_option(), Some(42));
    }
}
