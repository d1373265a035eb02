use std::sync::Arc;

use chirp_auth::AuthConfig;
use chirp_auth::AuthenticationFacade;
use chirp_auth::InMemoryCredentialStore;
use chirp_auth::UserCredentials;
use http::header::AUTHORIZATION;
use http::HeaderMap;
use http::HeaderValue;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Facade wired to an in-memory store, with one registered user.
pub struct TestAuth {
    pub facade: AuthenticationFacade<InMemoryCredentialStore, InMemoryCredentialStore>,
    pub store: Arc<InMemoryCredentialStore>,
    pub user_id: Uuid,
    pub email: String,
    pub password: String,
}

impl TestAuth {
    pub async fn new() -> Self {
        let config = AuthConfig::with_secret(TEST_SECRET);
        let store = Arc::new(InMemoryCredentialStore::new());
        let facade = AuthenticationFacade::from_config(&config, Arc::clone(&store), Arc::clone(&store));

        let email = "walt@breakingbad.com".to_string();
        let password = "04234".to_string();
        let user_id = Uuid::new_v4();
        let password_hash = facade
            .hash_password(&password)
            .expect("Failed to hash password");

        store
            .insert_user(UserCredentials {
                user_id,
                email: email.clone(),
                password_hash,
            })
            .await;

        Self {
            facade,
            store,
            user_id,
            email,
            password,
        }
    }
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", token)).expect("Invalid header value"),
    );
    headers
}
