//! Login, request authorization and refresh token lifecycle.
//!
//! Every refusal leaving this module is generic: an unknown email and a wrong
//! password are both `InvalidCredentials`, and a missing, malformed, forged
//! or expired credential is always `Unauthorized`. The specific reason is
//! only written to the log. Keep it that way; distinguishing these cases
//! for callers turns login into an account-enumeration oracle.

use std::sync::Arc;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use http::HeaderMap;
use thiserror::Error;
use uuid::Uuid;

use crate::bearer::extract_bearer;
use crate::config::AuthConfig;
use crate::jwt::AccessTokenCodec;
use crate::jwt::TokenError;
use crate::password::argon2::DUMMY_HASH;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::RefreshTokenError;
use crate::refresh::RefreshTokenIssuer;
use crate::store::RefreshTokenStore;
use crate::store::StoreError;
use crate::store::UserCredentialStore;

/// Tokens handed out by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginTokens {
    pub user_id: Uuid,
    /// Signed access token
    pub access_token: String,
    /// Opaque refresh token
    pub refresh_token: String,
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
}

/// Login errors visible to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal authentication error: {0}")]
    Internal(String),
}

/// Authorization errors visible to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal authorization error: {0}")]
    Internal(String),
}

/// Specific reason a request was refused. Logged, never returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub(crate) enum Denial {
    #[error("unknown email")]
    UnknownEmail,

    #[error("password mismatch")]
    PasswordMismatch,

    #[error("missing bearer credential")]
    MissingCredential,

    #[error("access token rejected: {0}")]
    AccessToken(TokenError),

    #[error("unknown refresh token")]
    UnknownRefreshToken,

    #[error("refresh token rejected: {0}")]
    RefreshToken(RefreshTokenError),
}

#[derive(Debug, Error)]
enum Rejection {
    #[error(transparent)]
    Denied(#[from] Denial),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Internal(String),
}

impl From<TokenError> for Rejection {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::EncodingFailed(e) => Rejection::Internal(e),
            other => Rejection::Denied(Denial::AccessToken(other)),
        }
    }
}

/// Entry point for authentication flows.
///
/// Composes password verification, access token signing, refresh token
/// minting and bearer extraction over the injected stores.
pub struct AuthenticationFacade<U, R>
where
    U: UserCredentialStore,
    R: RefreshTokenStore,
{
    users: Arc<U>,
    refresh_tokens: Arc<R>,
    password_hasher: PasswordHasher,
    access_tokens: AccessTokenCodec,
    refresh_issuer: RefreshTokenIssuer,
    access_token_ttl: Duration,
}

impl<U, R> AuthenticationFacade<U, R>
where
    U: UserCredentialStore,
    R: RefreshTokenStore,
{
    /// Create a facade from its components.
    ///
    /// # Arguments
    /// * `users` - Account lookup implementation
    /// * `refresh_tokens` - Refresh token persistence implementation
    /// * `access_tokens` - Codec holding the signing secret
    /// * `access_token_ttl` - Lifetime of issued access tokens
    /// * `refresh_issuer` - Minting policy for refresh tokens
    pub fn new(
        users: Arc<U>,
        refresh_tokens: Arc<R>,
        access_tokens: AccessTokenCodec,
        access_token_ttl: Duration,
        refresh_issuer: RefreshTokenIssuer,
    ) -> Self {
        Self {
            users,
            refresh_tokens,
            password_hasher: PasswordHasher::new(),
            access_tokens,
            refresh_issuer,
            access_token_ttl,
        }
    }

    /// Create a facade from loaded configuration.
    pub fn from_config(config: &AuthConfig, users: Arc<U>, refresh_tokens: Arc<R>) -> Self {
        Self::new(
            users,
            refresh_tokens,
            AccessTokenCodec::new(config.jwt.secret.as_bytes(), config.jwt.issuer.clone()),
            config.access_token_ttl(),
            RefreshTokenIssuer::new(config.refresh_token_ttl()),
        )
    }

    /// Hash a password for storage when registering or updating a user.
    ///
    /// # Errors
    /// * `EmptyPassword` - Password is empty
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token plus a persisted refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Email unknown or password wrong (indistinguishable)
    /// * `StoreUnavailable` - A store call failed
    /// * `Internal` - Token generation failed
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginTokens, AuthenticationError> {
        match self.try_login(email, password).await {
            Ok(tokens) => {
                tracing::info!(user_id = %tokens.user_id, "User logged in");
                Ok(tokens)
            }
            Err(Rejection::Denied(reason)) => {
                tracing::warn!(operation = "login", %reason, "Login refused");
                Err(AuthenticationError::InvalidCredentials)
            }
            Err(Rejection::Store(e)) => {
                tracing::error!(operation = "login", error = %e, "Credential store failure");
                Err(AuthenticationError::StoreUnavailable(e.to_string()))
            }
            Err(Rejection::Internal(e)) => {
                tracing::error!(operation = "login", error = %e, "Token generation failed");
                Err(AuthenticationError::Internal(e))
            }
        }
    }

    /// Resolve the user behind the access token in the `Authorization` header.
    ///
    /// # Errors
    /// * `Unauthorized` - Credential missing, malformed, forged or expired
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Uuid, AuthorizationError> {
        self.try_authorize(headers)
            .map_err(|e| Self::authorization_error("authorize", e))
    }

    /// Exchange the refresh token in the `Authorization` header for a new access token.
    ///
    /// The refresh token itself is neither rotated nor extended.
    ///
    /// # Errors
    /// * `Unauthorized` - Credential missing, unknown, revoked or expired
    /// * `StoreUnavailable` - Lookup failed
    /// * `Internal` - Token generation failed
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<String, AuthorizationError> {
        match self.try_refresh(headers).await {
            Ok((user_id, token)) => {
                tracing::debug!(%user_id, "Access token refreshed");
                Ok(token)
            }
            Err(e) => Err(Self::authorization_error("refresh", e)),
        }
    }

    /// Revoke the refresh token in the `Authorization` header.
    ///
    /// Revoking an unknown or already revoked token succeeds.
    ///
    /// # Errors
    /// * `Unauthorized` - No bearer credential present
    /// * `StoreUnavailable` - Store call failed
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<(), AuthorizationError> {
        self.try_revoke(headers)
            .await
            .map_err(|e| Self::authorization_error("revoke", e))
    }

    /// Revoke every refresh token of a user, e.g. after a password change.
    ///
    /// # Returns
    /// Number of tokens newly revoked
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store call failed
    pub async fn revoke_all_for_user(&self, user_id: &Uuid) -> Result<u64, AuthorizationError> {
        let revoked = self
            .refresh_tokens
            .revoke_all_for_user(user_id, Utc::now())
            .await
            .map_err(|e| Self::authorization_error("revoke_all", e.into()))?;

        tracing::info!(%user_id, revoked, "Refresh tokens revoked for user");
        Ok(revoked)
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<LoginTokens, Rejection> {
        let Some(user) = self.users.find_user_by_email(email).await? else {
            // Burn the same verification cost as a real account.
            let _ = self.password_hasher.verify(password, DUMMY_HASH);
            return Err(Denial::UnknownEmail.into());
        };

        self.password_hasher
            .verify(password, &user.password_hash)
            .map_err(|_| Denial::PasswordMismatch)?;

        let access_token = self
            .access_tokens
            .issue(user.user_id, self.access_token_ttl)?;

        let new_token = self
            .refresh_issuer
            .issue_for(user.user_id, Utc::now())
            .map_err(|e| Rejection::Internal(e.to_string()))?;

        let record = self
            .refresh_tokens
            .persist_refresh_token(new_token)
            .await?;

        Ok(LoginTokens {
            user_id: user.user_id,
            access_token,
            refresh_token: record.token,
            refresh_token_expires_at: record.expires_at,
        })
    }

    fn try_authorize(&self, headers: &HeaderMap) -> Result<Uuid, Rejection> {
        let token = extract_bearer(headers).map_err(|_| Denial::MissingCredential)?;
        Ok(self.access_tokens.verify(token)?)
    }

    async fn try_refresh(&self, headers: &HeaderMap) -> Result<(Uuid, String), Rejection> {
        let token = extract_bearer(headers).map_err(|_| Denial::MissingCredential)?;

        let record = self
            .refresh_tokens
            .find_refresh_token(token)
            .await?
            .ok_or(Denial::UnknownRefreshToken)?;

        record.check(Utc::now()).map_err(Denial::RefreshToken)?;

        let access_token = self
            .access_tokens
            .issue(record.user_id, self.access_token_ttl)?;

        Ok((record.user_id, access_token))
    }

    async fn try_revoke(&self, headers: &HeaderMap) -> Result<(), Rejection> {
        let token = extract_bearer(headers).map_err(|_| Denial::MissingCredential)?;

        match self.refresh_tokens.mark_revoked(token, Utc::now()).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound(_)) => {
                tracing::debug!("Revoke requested for unknown refresh token");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn authorization_error(operation: &'static str, rejection: Rejection) -> AuthorizationError {
        match rejection {
            Rejection::Denied(reason) => {
                tracing::warn!(operation, %reason, "Request unauthorized");
                AuthorizationError::Unauthorized
            }
            Rejection::Store(StoreError::NotFound(e)) => {
                tracing::warn!(operation, error = %e, "Request unauthorized");
                AuthorizationError::Unauthorized
            }
            Rejection::Store(e) => {
                tracing::error!(operation, error = %e, "Credential store failure");
                AuthorizationError::StoreUnavailable(e.to_string())
            }
            Rejection::Internal(e) => {
                tracing::error!(operation, error = %e, "Token generation failed");
                AuthorizationError::Internal(e)
            }
        }
    }
}
