use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::errors::StoreError;
use super::ports::RefreshTokenStore;
use super::ports::UserCredentialStore;
use super::ports::UserCredentials;
use crate::refresh::NewRefreshToken;
use crate::refresh::RefreshTokenRecord;

/// Process-local credential store.
///
/// Keeps users keyed by email and refresh tokens keyed by value. Every write
/// is visible to the next read, revocations included.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<String, UserCredentials>>>,
    refresh_tokens: Arc<RwLock<HashMap<String, RefreshTokenRecord>>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user account, replacing any account with the same email.
    pub async fn insert_user(&self, credentials: UserCredentials) {
        self.users
            .write()
            .await
            .insert(credentials.email.clone(), credentials);
    }

    /// Number of refresh tokens ever persisted.
    pub async fn refresh_token_count(&self) -> usize {
        self.refresh_tokens.read().await.len()
    }
}

#[async_trait]
impl UserCredentialStore for InMemoryCredentialStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserCredentials>, StoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryCredentialStore {
    async fn persist_refresh_token(
        &self,
        token: NewRefreshToken,
    ) -> Result<RefreshTokenRecord, StoreError> {
        let record = RefreshTokenRecord {
            token: token.token,
            user_id: token.user_id,
            created_at: Utc::now(),
            expires_at: Some(token.expires_at),
            revoked_at: None,
        };

        self.refresh_tokens
            .write()
            .await
            .insert(record.token.clone(), record.clone());

        Ok(record)
    }

    async fn find_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<RefreshTokenRecord>, StoreError> {
        Ok(self.refresh_tokens.read().await.get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut refresh_tokens = self.refresh_tokens.write().await;
        let record = refresh_tokens
            .get_mut(token)
            .ok_or_else(|| StoreError::NotFound("refresh token".to_string()))?;

        record.revoked_at.get_or_insert(at);
        Ok(())
    }

    async fn revoke_all_for_user(
        &self,
        user_id: &Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let mut refresh_tokens = self.refresh_tokens.write().await;
        let mut revoked = 0;
        for record in refresh_tokens.values_mut() {
            if record.user_id == *user_id && record.revoked_at.is_none() {
                record.revoked_at = Some(at);
                revoked += 1;
            }
        }
        Ok(revoked)
    }
}
