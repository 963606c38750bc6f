use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    /// The user dismissed a prompt or picker. Not a fault.
    #[error("Bridge operation cancelled: {0}")]
    Cancelled(String),

    #[error("Bridge payload could not be decoded: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    /// Whether this error represents a user decision rather than a fault.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, BridgeError::Cancelled(_))
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
