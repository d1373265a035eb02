use thiserror::Error;

/// Error type for password operations.
///
/// `Mismatch` covers both a wrong password and an unparseable stored hash;
/// callers only learn that verification did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password does not match")]
    Mismatch,
}
