use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error(transparent)]
    Runtime(#[from] core_runtime::Error),

    #[error("Bridge error: {0}")]
    Bridge(#[from] bridge_traits::BridgeError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;
