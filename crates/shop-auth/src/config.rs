//! # Auth Configuration
//!
//! Configuration for token signing and password hashing.
//! Secrets are loaded from environment variables.

use chrono::Duration;
use shop_core::ShopError;
use std::env;
use std::fmt;

/// Shortest accepted HMAC secret, in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Simple-JWT style defaults: five minute access, one day refresh
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 5 * 60;
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 24 * 60 * 60;

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Settings {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for Argon2Settings {
    /// OWASP minimum for Argon2id (19 MiB, 2 passes, 1 lane)
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

/// Token and hashing configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: String,

    /// Access token lifetime
    pub access_ttl: Duration,

    /// Refresh token lifetime
    pub refresh_ttl: Duration,

    /// Password hashing cost
    pub argon2: Argon2Settings,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("argon2", &self.argon2)
            .finish()
    }
}

fn env_number<T: std::str::FromStr>(key: &str, default: T) -> Result<T, ShopError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ShopError::Configuration(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}

impl AuthConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `JWT_SECRET` (at least 32 bytes)
    ///
    /// Optional:
    /// - `ACCESS_TOKEN_TTL_SECS`, `REFRESH_TOKEN_TTL_SECS`
    /// - `ARGON2_MEMORY_KIB`, `ARGON2_ITERATIONS`, `ARGON2_PARALLELISM`
    pub fn from_env() -> Result<Self, ShopError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| ShopError::Configuration("JWT_SECRET not set".to_string()))?;

        let defaults = Argon2Settings::default();
        let config = Self {
            jwt_secret,
            access_ttl: Duration::seconds(env_number(
                "ACCESS_TOKEN_TTL_SECS",
                DEFAULT_ACCESS_TTL_SECS,
            )?),
            refresh_ttl: Duration::seconds(env_number(
                "REFRESH_TOKEN_TTL_SECS",
                DEFAULT_REFRESH_TTL_SECS,
            )?),
            argon2: Argon2Settings {
                memory_kib: env_number("ARGON2_MEMORY_KIB", defaults.memory_kib)?,
                iterations: env_number("ARGON2_ITERATIONS", defaults.iterations)?,
                parallelism: env_number("ARGON2_PARALLELISM", defaults.parallelism)?,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit secret and default lifetimes (for testing)
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            argon2: Argon2Settings::default(),
        }
    }

    /// Check secret length and lifetimes
    pub fn validate(&self) -> Result<(), ShopError> {
        if self.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(ShopError::Configuration(format!(
                "JWT_SECRET must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }
        if self.access_ttl <= Duration::zero() || self.refresh_ttl <= Duration::zero() {
            return Err(ShopError::Configuration(
                "token lifetimes must be positive".to_string(),
            ));
        }
        if self.refresh_ttl < self.access_ttl {
            return Err(ShopError::Configuration(
                "refresh token must outlive the access token".to_string(),
            ));
        }
        Ok(())
    }

    /// Builder: set access token lifetime
    pub fn with_access_ttl(mut self, ttl: Duration) -> Self {
        self.access_ttl = ttl;
        self
    }

    /// Builder: set refresh token lifetime
    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_ttl = ttl;
        self
    }

    /// Builder: set hashing cost
    pub fn with_argon2(mut self, settings: Argon2Settings) -> Self {
        self.argon2 = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new(SECRET);
        assert_eq!(config.access_ttl, Duration::minutes(5));
        assert_eq!(config.refresh_ttl, Duration::days(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_secret_rejected() {
        let config = AuthConfig::new("short");
        assert!(matches!(config.validate(), Err(ShopError::Configuration(_))));
    }

    #[test]
    fn test_refresh_must_outlive_access() {
        let config = AuthConfig::new(SECRET)
            .with_access_ttl(Duration::hours(2))
            .with_refresh_ttl(Duration::hours(1));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", AuthConfig::new(SECRET));
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_from_env_missing_secret() {
        env::remove_var("JWT_SECRET");

        let result = AuthConfig::from_env();
        assert!(result.is_err());
    }
}
