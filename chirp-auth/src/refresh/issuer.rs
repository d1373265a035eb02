use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use uuid::Uuid;

use super::errors::RefreshTokenError;
use super::models::NewRefreshToken;

/// Number of random bytes in a refresh token (256 bits).
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Mints opaque refresh tokens.
///
/// Tokens are random bytes from the operating system's entropy source,
/// hex-encoded. They carry no structure and are only meaningful to the store.
#[derive(Debug, Clone, Copy)]
pub struct RefreshTokenIssuer {
    ttl: Duration,
}

impl RefreshTokenIssuer {
    /// Create an issuer whose tokens live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Lifetime given to each minted token.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Generate a new token value.
    pub fn mint(&self) -> String {
        let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Mint a token for `user_id` and attach its expiry, ready to persist.
    pub fn issue_for(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<NewRefreshToken, RefreshTokenError> {
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(RefreshTokenError::LifetimeOutOfRange)?;

        Ok(NewRefreshToken {
            token: self.mint(),
            user_id,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_mint_format() {
        let issuer = RefreshTokenIssuer::new(Duration::days(60));
        let token = issuer.mint();

        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_mint_is_unique() {
        let issuer = RefreshTokenIssuer::new(Duration::days(60));
        let tokens: HashSet<String> = (0..1000).map(|_| issuer.mint()).collect();

        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_issue_for_sets_expiry() {
        let issuer = RefreshTokenIssuer::new(Duration::days(60));
        let user_id = Uuid::new_v4();
        let now = Utc::now();

        let token = issuer.issue_for(user_id, now).unwrap();

        assert_eq!(token.user_id, user_id);
        assert_eq!(token.expires_at - now, Duration::days(60));
        assert_eq!(token.token.len(), 64);
    }

    #[test]
    fn test_issue_for_rejects_unrepresentable_expiry() {
        let issuer = RefreshTokenIssuer::new(Duration::days(1_000_000_000));

        assert_eq!(
            issuer.issue_for(Uuid::new_v4(), Utc::now()),
            Err(RefreshTokenError::LifetimeOutOfRange)
        );
    }
}
