//! # Token Issuer
//!
//! HS256 access/refresh token pairs bound to a user id. Both token kinds
//! share a signing key and are told apart by the `token_type` claim, so an
//! access token can never be used to refresh and a refresh token can never
//! authenticate a request.

use crate::config::AuthConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shop_core::{ShopError, ShopResult};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Which half of the pair a token is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims for both access and refresh tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub token_type: TokenType,
    /// Unique token id
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
}

impl TokenClaims {
    pub fn user_id(&self) -> ShopResult<i64> {
        self.sub.parse().map_err(|_| ShopError::InvalidToken)
    }
}

/// Tokens returned on register and login
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub refresh: String,
    pub access: String,
}

/// Signs and verifies tokens
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            access_ttl: config.access_ttl,
            refresh_ttl: config.refresh_ttl,
        }
    }

    fn sign(&self, user_id: i64, token_type: TokenType, ttl: Duration) -> ShopResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            token_type,
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ShopError::Internal(format!("token signing failed: {}", e)))
    }

    /// Issue a fresh refresh/access pair for a user
    pub fn issue_pair(&self, user_id: i64) -> ShopResult<TokenPair> {
        Ok(TokenPair {
            refresh: self.sign(user_id, TokenType::Refresh, self.refresh_ttl)?,
            access: self.issue_access(user_id)?,
        })
    }

    /// Issue an access token only
    pub fn issue_access(&self, user_id: i64) -> ShopResult<String> {
        self.sign(user_id, TokenType::Access, self.access_ttl)
    }

    /// Verify signature, expiry and token type
    pub fn decode(&self, token: &str, expected: TokenType) -> ShopResult<TokenClaims> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            ShopError::InvalidToken
        })?;

        if data.claims.token_type != expected {
            debug!(
                "Token rejected: expected {:?}, got {:?}",
                expected, data.claims.token_type
            );
            return Err(ShopError::InvalidToken);
        }
        Ok(data.claims)
    }

    /// Verify an access token and return its user id
    pub fn verify_access(&self, token: &str) -> ShopResult<i64> {
        self.decode(token, TokenType::Access)?.user_id()
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is neither rotated nor revoked.
    pub fn refresh_access(&self, refresh_token: &str) -> ShopResult<String> {
        let user_id = self.decode(refresh_token, TokenType::Refresh)?.user_id()?;
        self.issue_access(user_id)
    }
}
