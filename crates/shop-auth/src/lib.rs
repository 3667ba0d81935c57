//! # shop-auth
//!
//! Credentials and tokens for storefront-rs.
//!
//! 1. **TokenIssuer** - HS256 access/refresh pairs
//!    - `issue_pair()` on register and login
//!    - `verify_access()` on every authenticated request
//!    - `refresh_access()` for the refresh endpoint
//!
//! 2. **Argon2Hasher** - Argon2id password hashing on the blocking pool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shop_auth::{AuthConfig, Argon2Hasher, TokenIssuer};
//!
//! let config = AuthConfig::from_env()?;
//! let tokens = TokenIssuer::new(&config);
//! let hasher = Argon2Hasher::new(&config.argon2)?;
//!
//! let hash = hasher.hash("s3cret").await?;
//! let pair = tokens.issue_pair(user.id)?;
//! let user_id = tokens.verify_access(&pair.access)?;
//! ```

pub mod config;
pub mod password;
pub mod token;

// Re-exports
pub use config::{Argon2Settings, AuthConfig};
pub use password::Argon2Hasher;
pub use token::{TokenClaims, TokenIssuer, TokenPair, TokenType};
