use thiserror::Error;

/// Error for bearer credential extraction.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Missing or malformed bearer credential")]
    Missing,
}
