//! # Shop Error Types
//!
//! Typed error handling for the storefront.
//! All store, auth and validation operations return `Result<T, ShopError>`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field-level validation messages, keyed by payload field name.
///
/// Collected rather than raised: a single payload can fail on several
/// fields at once and every message is reported back to the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Record a message against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Builder: single-field error set
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Merge another set of errors into this one
    pub fn extend(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|m| m.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(|k| k.as_str())
    }

    /// `Ok(())` when empty, otherwise a validation error carrying self
    pub fn into_result(self) -> ShopResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ShopError::Validation(self))
        }
    }
}

/// Core error type for all storefront operations
#[derive(Debug, Error)]
pub enum ShopError {
    /// Bad, missing or duplicate input fields
    #[error("Validation failed")]
    Validation(FieldErrors),

    /// Login failed. Deliberately does not say which credential was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// No bearer token on a request that needs one
    #[error("Authentication credentials were not provided")]
    NotAuthenticated,

    /// Malformed, expired, wrong-type or foreign-signed token
    #[error("Token is invalid or expired")]
    InvalidToken,

    /// Unknown key, or a record outside the caller's visibility
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// Configuration errors (missing secrets, bad values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Data store failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ShopError {
    /// Shorthand for a not-found error
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        ShopError::NotFound {
            entity,
            key: key.into(),
        }
    }

    /// Shorthand for a single-field validation error
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ShopError::Validation(FieldErrors::single(field, message))
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShopError::Validation(_) => 400,
            ShopError::InvalidCredentials => 401,
            ShopError::NotAuthenticated => 401,
            ShopError::InvalidToken => 401,
            ShopError::NotFound { .. } => 404,
            ShopError::Configuration(_) => 500,
            ShopError::Storage(_) => 500,
            ShopError::Internal(_) => 500,
        }
    }

    /// Server-side failure (worth logging)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Field errors, for validation failures
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ShopError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Result type alias for storefront operations
pub type ShopResult<T> = Result<T, ShopError>;
