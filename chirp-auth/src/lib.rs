//! Credential and token lifecycle for the Chirpy service
//!
//! Provides the security-relevant half of authentication:
//! - Password hashing (Argon2id)
//! - Access token signing and verification (HS256 JWT)
//! - Opaque refresh token minting and usability rules
//! - Bearer credential extraction from request headers
//! - A facade composing these into login, authorize, refresh and revoke
//!
//! Storage of users and refresh tokens stays with the caller, behind the
//! ports in [`store`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use chirp_auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).is_ok());
//! ```
//!
//! ## Access Tokens
//! ```
//! use chirp_auth::AccessTokenCodec;
//! use chrono::Duration;
//! use uuid::Uuid;
//!
//! let codec = AccessTokenCodec::new(b"secret_key_at_least_32_bytes_long!", "chirpy");
//! let user_id = Uuid::new_v4();
//! let token = codec.issue(user_id, Duration::hours(1)).unwrap();
//! assert_eq!(codec.verify(&token).unwrap(), user_id);
//! ```
//!
//! ## Bearer Credentials
//! ```
//! use chirp_auth::parse_bearer;
//!
//! assert_eq!(parse_bearer("Bearer abc123").unwrap(), "abc123");
//! assert!(parse_bearer("Basic abc123").is_err());
//! ```

pub mod bearer;
pub mod config;
pub mod facade;
pub mod jwt;
pub mod password;
pub mod refresh;
pub mod store;

// Re-export commonly used items
pub use bearer::extract_bearer;
pub use bearer::parse_bearer;
pub use bearer::CredentialError;
pub use crate::config::AuthConfig;
pub use facade::AuthenticationError;
pub use facade::AuthenticationFacade;
pub use facade::AuthorizationError;
pub use facade::LoginTokens;
pub use jwt::AccessClaims;
pub use jwt::AccessTokenCodec;
pub use jwt::TokenError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::NewRefreshToken;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenIssuer;
pub use refresh::RefreshTokenRecord;
pub use store::InMemoryCredentialStore;
pub use store::RefreshTokenStore;
pub use store::StoreError;
pub use store::UserCredentialStore;
pub use store::UserCredentials;
