use thiserror::Error;

/// Error for credential store operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Credential store unavailable: {0}")]
    Unavailable(String),
}
