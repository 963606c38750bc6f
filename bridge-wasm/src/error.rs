//! Error types for WebAssembly bridge implementations

use bridge_traits::error::BridgeError;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Result type for WebAssembly bridge operations
pub type WasmResult<T> = Result<T, WasmError>;

/// Errors that can occur in WebAssembly bridge implementations
#[derive(Error, Debug)]
pub enum WasmError {
    /// JavaScript error from web-sys
    #[error("JavaScript error: {0}")]
    JavaScript(String),

    /// A browser global (`window`, `localStorage`) is missing, e.g. in a worker
    #[error("Browser API not available: {0}")]
    NotAvailable(String),

    /// Attaching or detaching a DOM event listener failed
    #[error("Event listener error: {0}")]
    Listener(String),
}

impl From<WasmError> for BridgeError {
    fn from(err: WasmError) -> Self {
        match err {
            WasmError::NotAvailable(api) => BridgeError::NotAvailable(api),
            other => BridgeError::OperationFailed(other.to_string()),
        }
    }
}

impl From<JsValue> for WasmError {
    fn from(js_value: JsValue) -> Self {
        WasmError::JavaScript(js_message(&js_value))
    }
}

/// Readable message for a thrown JS value
pub(crate) fn js_message(js_value: &JsValue) -> String {
    if let Some(message) = js_value.as_string() {
        message
    } else if let Some(error) = js_value.dyn_ref::<js_sys::Error>() {
        error.message().into()
    } else {
        format!("{:?}", js_value)
    }
}

/// Bridge error for a failed browser call, tagged with what was attempted.
pub(crate) fn js_error(context: &str, err: JsValue) -> BridgeError {
    BridgeError::OperationFailed(format!("{context}: {}", js_message(&err)))
}
