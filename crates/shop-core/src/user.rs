//! # User Types
//!
//! Account identity, credential and role flags.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored user account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier
    pub id: i64,

    /// Unique login name
    pub username: String,

    pub email: String,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub phone: String,

    #[serde(default)]
    pub address: String,

    /// Argon2 PHC string. Never part of a transport record.
    pub password_hash: String,

    /// Staff (true) or customer (false)
    #[serde(default)]
    pub is_staff: bool,

    /// Inactive accounts cannot log in or authenticate
    #[serde(default = "default_true")]
    pub is_active: bool,

    pub date_joined: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// A user about to be created. The store assigns `id` and `date_joined`.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub password_hash: String,
    pub is_staff: bool,
}

impl NewUser {
    /// Customer account with only the required fields
    pub fn customer(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            ..Default::default()
        }
    }

    /// Builder: set first and last name
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Builder: set contact details
    pub fn with_contact(mut self, phone: impl Into<String>, address: impl Into<String>) -> Self {
        self.phone = phone.into();
        self.address = address.into();
        self
    }

    /// Builder: mark as staff
    pub fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }

    /// Materialize with the store-assigned id
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            address: self.address,
            password_hash: self.password_hash,
            is_staff: self.is_staff,
            is_active: true,
            date_joined: Utc::now(),
        }
    }
}
