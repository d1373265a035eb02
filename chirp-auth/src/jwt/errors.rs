use thiserror::Error;

/// Error type for access token operations.
///
/// Verification yields exactly one of `Malformed`, `SignatureMismatch` or
/// `Expired`, checked in that order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Token is expired")]
    Expired,
}
