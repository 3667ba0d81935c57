//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the data store, token issuer, password hasher and configuration.

use shop_auth::{Argon2Hasher, AuthConfig, TokenIssuer};
use shop_core::{SharedStore, ShopResult};
use shop_store::{Catalog, MemoryStore};
use std::net::{AddrParseError, SocketAddr};
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Explicit seed catalog path (otherwise searched for)
    pub catalog_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            catalog_path: std::env::var("CATALOG_PATH").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Data store
    pub store: SharedStore,
    /// Token signing and verification
    pub tokens: Arc<TokenIssuer>,
    /// Password hashing
    pub hasher: Argon2Hasher,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by an in-memory store seeded from the
    /// catalog file
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        let auth = AuthConfig::from_env()?;

        let catalog = load_catalog(config.catalog_path.as_deref())?;
        let store = MemoryStore::with_catalog(&catalog).await?;

        Ok(Self::from_parts(config, Arc::new(store), &auth)?)
    }

    /// Assemble state from explicit parts (tests, alternative stores)
    pub fn from_parts(
        config: AppConfig,
        store: SharedStore,
        auth: &AuthConfig,
    ) -> ShopResult<Self> {
        auth.validate()?;
        Ok(Self {
            store,
            tokens: Arc::new(TokenIssuer::new(auth)),
            hasher: Argon2Hasher::new(&auth.argon2)?,
            config,
        })
    }
}

/// Load the seed catalog from an explicit path, or the first
/// `config/catalog.toml` found walking up from the working directory
fn load_catalog(explicit: Option<&str>) -> anyhow::Result<Catalog> {
    if let Some(path) = explicit {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
        return parse_catalog(&content, path);
    }

    let config_paths = [
        "config/catalog.toml",
        "../config/catalog.toml",
        "../../config/catalog.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            return parse_catalog(&content, path);
        }
    }

    // Return empty catalog if no config found
    tracing::warn!("No catalog found, starting with an empty store");
    Ok(Catalog::new())
}

fn parse_catalog(content: &str, path: &str) -> anyhow::Result<Catalog> {
    let catalog = Catalog::from_toml(content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path, e))?;
    tracing::info!(
        "Read {} categories and {} products from {}",
        catalog.categories.len(),
        catalog.products.len(),
        path
    );
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shop_auth::Argon2Settings;

    fn test_config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            catalog_path: None,
        }
    }

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("ENVIRONMENT");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(!config.is_production());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_bad_socket_addr() {
        let config = AppConfig {
            host: "not a host".to_string(),
            ..test_config()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_from_parts_rejects_weak_secret() {
        let auth = AuthConfig::new("short");
        let result = AppState::from_parts(test_config(), Arc::new(MemoryStore::new()), &auth);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_parts() {
        let auth = AuthConfig::new("0123456789abcdef0123456789abcdef").with_argon2(Argon2Settings {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        });
        let store = Arc::new(MemoryStore::new());
        let state = AppState::from_parts(test_config(), store, &auth).unwrap();
        assert_eq!(state.store.backend_name(), "memory");
    }

    #[test]
    fn test_parse_catalog_error_names_path() {
        let err = parse_catalog("[[products]]\nname = 1", "bad.toml").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
