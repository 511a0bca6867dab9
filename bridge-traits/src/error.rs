use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Media source rejected: {0}")]
    SourceRejected(String),

    #[error("Engine is in an illegal state for {operation}")]
    IllegalState { operation: &'static str },
}

pub type Result<T> = std::result::Result<T, BridgeError>;
