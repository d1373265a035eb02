use std::env;
use std::fmt;

use chrono::Duration;
use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::jwt::DEFAULT_ISSUER;

const DEFAULT_ACCESS_TOKEN_TTL_SECONDS: i64 = 60 * 60;
const DEFAULT_REFRESH_TOKEN_TTL_DAYS: i64 = 60;
const MAX_ACCESS_TOKEN_TTL_SECONDS: i64 = 24 * 60 * 60;
const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 10 * 365;

/// Prefix of environment variables overriding file settings.
const ENV_PREFIX: &str = "CHIRPY";

/// Process-wide authentication settings.
///
/// Loaded once at startup and read-only afterwards.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
    #[serde(default)]
    pub refresh_token: RefreshTokenConfig,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_access_token_ttl_seconds")]
    pub access_token_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshTokenConfig {
    pub ttl_days: i64,
}

fn default_issuer() -> String {
    DEFAULT_ISSUER.to_string()
}

fn default_access_token_ttl_seconds() -> i64 {
    DEFAULT_ACCESS_TOKEN_TTL_SECONDS
}

impl Default for RefreshTokenConfig {
    fn default() -> Self {
        Self {
            ttl_days: DEFAULT_REFRESH_TOKEN_TTL_DAYS,
        }
    }
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .finish()
    }
}

impl AuthConfig {
    /// Configuration with the given secret and default lifetimes.
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self {
            jwt: JwtConfig {
                secret: secret.into(),
                issuer: default_issuer(),
                access_token_ttl_seconds: DEFAULT_ACCESS_TOKEN_TTL_SECONDS,
            },
            refresh_token: RefreshTokenConfig::default(),
        }
    }

    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (CHIRPY__JWT__SECRET, CHIRPY__REFRESH_TOKEN__TTL_DAYS, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: CHIRPY__JWT__SECRET=... overrides jwt.secret
            .add_source(environment());

        Self::from_builder(builder)
    }

    /// Build and validate configuration from prepared sources.
    pub fn from_builder(
        builder: config::builder::ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: AuthConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make tokens unsafe or unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must not be empty".to_string(),
            ));
        }
        if !(1..=MAX_ACCESS_TOKEN_TTL_SECONDS).contains(&self.jwt.access_token_ttl_seconds) {
            return Err(ConfigError::Message(format!(
                "jwt.access_token_ttl_seconds must be between 1 and {}",
                MAX_ACCESS_TOKEN_TTL_SECONDS
            )));
        }
        if !(1..=MAX_REFRESH_TOKEN_TTL_DAYS).contains(&self.refresh_token.ttl_days) {
            return Err(ConfigError::Message(format!(
                "refresh_token.ttl_days must be between 1 and {}",
                MAX_REFRESH_TOKEN_TTL_DAYS
            )));
        }
        Ok(())
    }

    /// Access token lifetime. Saturates for values `validate` would reject.
    pub fn access_token_ttl(&self) -> Duration {
        Duration::try_seconds(self.jwt.access_token_ttl_seconds).unwrap_or(Duration::MAX)
    }

    /// Refresh token lifetime. Saturates for values `validate` would reject.
    pub fn refresh_token_ttl(&self) -> Duration {
        Duration::try_days(self.refresh_token.ttl_days).unwrap_or(Duration::MAX)
    }
}

/// `CHIRPY__SECTION__KEY` variables, e.g. `CHIRPY__JWT__SECRET`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Result<AuthConfig, ConfigError> {
        AuthConfig::from_builder(
            ConfigBuilder::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
    }

    #[test]
    fn test_defaults() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "test-secret"
            "#,
        )
        .expect("Failed to load config");

        assert_eq!(config.jwt.issuer, "chirpy");
        assert_eq!(config.access_token_ttl(), Duration::hours(1));
        assert_eq!(config.refresh_token_ttl(), Duration::days(60));
    }

    #[test]
    fn test_overrides() {
        let config = from_toml(
            r#"
            [jwt]
            secret = "test-secret"
            issuer = "chirpy-staging"
            access_token_ttl_seconds = 300

            [refresh_token]
            ttl_days = 7
            "#,
        )
        .expect("Failed to load config");

        assert_eq!(config.jwt.issuer, "chirpy-staging");
        assert_eq!(config.access_token_ttl(), Duration::minutes(5));
        assert_eq!(config.refresh_token_ttl(), Duration::days(7));
    }

    #[test]
    fn test_missing_secret() {
        assert!(from_toml("").is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        let result = from_toml(
            r#"
            [jwt]
            secret = ""
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Message(_))));
    }

    #[test]
    fn test_non_positive_ttl_rejected() {
        let mut config = AuthConfig::with_secret("test-secret");
        config.jwt.access_token_ttl_seconds = 0;
        assert!(config.validate().is_err());

        let mut config = AuthConfig::with_secret("test-secret");
        config.refresh_token.ttl_days = -1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_excessive_ttl_rejected() {
        let mut config = AuthConfig::with_secret("test-secret");
        config.jwt.access_token_ttl_seconds = i64::MAX;
        assert!(config.validate().is_err());
        assert_eq!(config.access_token_ttl(), Duration::MAX);

        let mut config = AuthConfig::with_secret("test-secret");
        config.refresh_token.ttl_days = 1_000_000_000;
        assert!(config.validate().is_err());

        let mut config = AuthConfig::with_secret("test-secret");
        config.refresh_token.ttl_days = MAX_REFRESH_TOKEN_TTL_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides_file() {
        let variables = config::Map::from([
            ("CHIRPY__JWT__SECRET".to_string(), "from-env".to_string()),
            (
                "CHIRPY__REFRESH_TOKEN__TTL_DAYS".to_string(),
                "7".to_string(),
            ),
            ("JWT__SECRET".to_string(), "unprefixed".to_string()),
        ]);

        let config = AuthConfig::from_builder(
            ConfigBuilder::builder()
                .add_source(File::from_str(
                    r#"
                    [jwt]
                    secret = "from-file"
                    "#,
                    FileFormat::Toml,
                ))
                .add_source(environment().source(Some(variables))),
        )
        .expect("Failed to load config");

        assert_eq!(config.jwt.secret, "from-env");
        assert_eq!(config.refresh_token_ttl(), Duration::days(7));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::with_secret("super-secret-value");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-value"));
        assert!(rendered.contains("<redacted>"));
    }
}
