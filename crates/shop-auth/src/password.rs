//! # Password Hashing
//!
//! Argon2id hashing in PHC string format. Hashing is CPU-bound, so both
//! operations run on tokio's blocking pool.

use crate::config::Argon2Settings;
use argon2::{
    password_hash::{
        rand_core::OsRng, Error as PasswordHashError, PasswordHash, PasswordHasher,
        PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use shop_core::{ShopError, ShopResult};

#[derive(Debug, Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Hasher with the given cost settings
    pub fn new(settings: &Argon2Settings) -> ShopResult<Self> {
        Self::with_params(settings.memory_kib, settings.iterations, settings.parallelism)
    }

    /// Create with custom params (for testing or different environments)
    pub fn with_params(memory_kib: u32, iterations: u32, parallelism: u32) -> ShopResult<Self> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| ShopError::Configuration(format!("invalid Argon2 params: {}", e)))?;
        Ok(Self { params })
    }

    /// Hash a password with a fresh random salt
    pub async fn hash(&self, password: &str) -> ShopResult<String> {
        let password = password.to_string();
        let params = self.params.clone();

        tokio::task::spawn_blocking(move || {
            let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| ShopError::Internal(format!("password hashing failed: {}", e)))
        })
        .await
        .map_err(|e| ShopError::Internal(format!("hashing task failed: {}", e)))?
    }

    /// Check a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`; an unparseable hash is an error.
    pub async fn verify(&self, password: &str, hash: &str) -> ShopResult<bool> {
        let password = password.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash)
                .map_err(|e| ShopError::Internal(format!("stored hash unreadable: {}", e)))?;

            match Argon2::default().verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(PasswordHashError::Password) => Ok(false),
                Err(e) => Err(ShopError::Internal(format!(
                    "password verification failed: {}",
                    e
                ))),
            }
        })
        .await
        .map_err(|e| ShopError::Internal(format!("hashing task failed: {}", e)))?
    }
}
