use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use super::errors::RefreshTokenError;

/// Persisted state of an issued refresh token.
///
/// The record is owned by the store. The only mutation it ever sees is
/// `revoked_at` going from `None` to `Some`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Check whether the token may be exchanged for an access token at `now`.
    ///
    /// Revocation is reported ahead of expiry. A record without an expiry
    /// is treated as expired.
    ///
    /// # Errors
    /// * `Revoked` - Token was revoked, regardless of its expiry
    /// * `Expired` - Token has no expiry or `now` is not before it
    pub fn check(&self, now: DateTime<Utc>) -> Result<(), RefreshTokenError> {
        if self.revoked_at.is_some() {
            return Err(RefreshTokenError::Revoked);
        }

        match self.expires_at {
            Some(expires_at) if expires_at > now => Ok(()),
            _ => Err(RefreshTokenError::Expired),
        }
    }

    /// Boolean form of [`check`](Self::check).
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.check(now).is_ok()
    }
}

/// Refresh token handed to the store for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshToken {
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn record(expires_at: Option<DateTime<Utc>>, revoked_at: Option<DateTime<Utc>>) -> RefreshTokenRecord {
        RefreshTokenRecord {
            token: "f".repeat(64),
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
            expires_at,
            revoked_at,
        }
    }

    #[test]
    fn test_fresh_token_is_usable() {
        let now = Utc::now();
        let token = record(Some(now + Duration::days(60)), None);

        assert!(token.is_usable(now));
        assert_eq!(token.check(now), Ok(()));
    }

    #[test]
    fn test_expired_token_is_not_usable() {
        let now = Utc::now();
        let token = record(Some(now - Duration::seconds(1)), None);

        assert!(!token.is_usable(now));
        assert_eq!(token.check(now), Err(RefreshTokenError::Expired));
    }

    #[test]
    fn test_token_at_exact_expiry_is_not_usable() {
        let now = Utc::now();
        let token = record(Some(now), None);

        assert!(!token.is_usable(now));
    }

    #[test]
    fn test_missing_expiry_is_not_usable() {
        let now = Utc::now();
        let token = record(None, None);

        assert_eq!(token.check(now), Err(RefreshTokenError::Expired));
    }

    #[test]
    fn test_revoked_token_is_not_usable_before_expiry() {
        let now = Utc::now();
        let token = record(Some(now + Duration::days(60)), Some(now));

        assert!(!token.is_usable(now));
        assert_eq!(token.check(now), Err(RefreshTokenError::Revoked));
    }

    #[test]
    fn test_revoked_and_expired_reports_revoked() {
        let now = Utc::now();
        let token = record(Some(now - Duration::days(1)), Some(now - Duration::days(2)));

        assert_eq!(token.check(now), Err(RefreshTokenError::Revoked));
    }
}
