use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenError;

/// Claims carried by an access token.
///
/// Field order matches the registered-claims order used by common JWT
/// libraries so the encoded payload is byte-compatible with them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Issuer
    pub iss: String,

    /// Subject (hyphenated user UUID)
    pub sub: String,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issued at (Unix timestamp)
    pub iat: i64,
}

impl AccessClaims {
    /// Build claims for `subject` issued at `now` and living for `ttl`.
    ///
    /// A negative `ttl` yields claims that are already expired. Fails with
    /// `EncodingFailed` when `now + ttl` is not a representable instant.
    pub fn new(
        subject: Uuid,
        issuer: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| TokenError::EncodingFailed("token lifetime out of range".to_string()))?;

        Ok(Self {
            iss: issuer.to_string(),
            sub: subject.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        })
    }

    /// Parse the subject back into a user identifier.
    pub fn subject(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// Check if the claims are expired at `current_timestamp`.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
