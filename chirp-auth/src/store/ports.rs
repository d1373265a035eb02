use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::errors::StoreError;
use crate::refresh::NewRefreshToken;
use crate::refresh::RefreshTokenRecord;

/// Login material for one user account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
}

/// Lookup of user accounts by login email.
#[async_trait]
pub trait UserCredentialStore: Send + Sync + 'static {
    /// Retrieve login material by email address.
    ///
    /// # Returns
    /// Optional credentials (None if no account uses this email)
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError>;
}

/// Persistence of refresh token records.
///
/// Implementations must make a revocation visible to every later lookup of
/// the same token.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a newly minted refresh token.
    ///
    /// # Returns
    /// Stored record
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn persist_refresh_token(
        &self,
        token: NewRefreshToken,
    ) -> Result<RefreshTokenRecord, StoreError>;

    /// Retrieve a refresh token record by its opaque value.
    ///
    /// # Returns
    /// Optional record (None if the value was never issued)
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError>;

    /// Mark a refresh token as revoked at `at`.
    ///
    /// Revoking an already revoked token keeps the original timestamp.
    ///
    /// # Errors
    /// * `NotFound` - Token was never issued
    /// * `Unavailable` - Store could not be reached
    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError>;

    /// Revoke every unrevoked refresh token belonging to `user_id`.
    ///
    /// # Returns
    /// Number of tokens newly revoked
    ///
    /// # Errors
    /// * `Unavailable` - Store could not be reached
    async fn revoke_all_for_user(
        &self,
        user_id: &Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}
