use thiserror::Error;

/// Reason a refresh token cannot be used.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Refresh token has been revoked")]
    Revoked,

    #[error("Refresh token is expired")]
    Expired,

    #[error("Refresh token lifetime is out of range")]
    LifetimeOutOfRange,
}
