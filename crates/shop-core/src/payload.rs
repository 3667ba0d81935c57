//! # Inbound Payloads
//!
//! Validation of request bodies against entity shape. Problems are
//! collected into `FieldErrors`, one entry per offending field, so a
//! client sees every mistake in a single response.

use crate::error::FieldErrors;
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::{Validate, ValidationError, ValidationErrors};

pub const REQUIRED: &str = "This field is required.";
pub const BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NOT_AN_OBJECT: &str = "Invalid data. Expected a dictionary.";
pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const EMAIL_TAKEN: &str = "A user with that email already exists.";

/// Reads string fields out of a JSON object, recording presence and type
/// errors as it goes.
pub struct PayloadReader<'a> {
    object: Option<&'a Map<String, Value>>,
    errors: FieldErrors,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a Value) -> Self {
        let object = payload.as_object();
        let mut errors = FieldErrors::new();
        if object.is_none() {
            errors.add("non_field_errors", NOT_AN_OBJECT);
        }
        Self { object, errors }
    }

    fn raw(&self, field: &str) -> Option<&'a Value> {
        self.object
            .and_then(|o| o.get(field))
            .filter(|v| !v.is_null())
    }

    /// A required, non-blank string
    pub fn required(&mut self, field: &str) -> Option<String> {
        if self.object.is_none() {
            return None;
        }
        match self.raw(field) {
            None => {
                self.errors.add(field, REQUIRED);
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                self.errors.add(field, BLANK);
                None
            }
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => {
                self.errors.add(field, NOT_A_STRING);
                None
            }
        }
    }

    /// An optional string; absent or null reads as empty
    pub fn optional(&mut self, field: &str) -> String {
        match self.raw(field) {
            None => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(_) => {
                self.errors.add(field, NOT_A_STRING);
                String::new()
            }
        }
    }

    /// A string that is either usable or treated as missing, without
    /// recording anything
    pub fn lenient(&self, field: &str) -> Option<String> {
        match self.raw(field) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn into_errors(self) -> FieldErrors {
        self.errors
    }
}

/// Flatten validator output into field errors
pub fn from_validation_errors(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, errs) in errors.field_errors() {
        for err in errs.iter() {
            let message = err
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| err.code.to_string());
            out.add(field.to_string(), message);
        }
    }
    out
}

fn validate_username_chars(username: &str) -> Result<(), ValidationError> {
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if ok {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars").with_message(Cow::Borrowed(
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        )))
    }
}

/// A validated registration request
#[derive(Debug, Clone, Default, Validate)]
pub struct Registration {
    #[validate(
        length(max = 150, message = "Ensure this field has no more than 150 characters."),
        custom(function = "validate_username_chars")
    )]
    pub username: String,

    #[validate(
        email(message = "Enter a valid email address."),
        length(max = 254, message = "Ensure this field has no more than 254 characters.")
    )]
    pub email: String,

    pub password: String,

    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub first_name: String,

    #[validate(length(max = 150, message = "Ensure this field has no more than 150 characters."))]
    pub last_name: String,

    pub phone: String,

    pub address: String,
}

impl Registration {
    /// Parse and validate a registration body.
    ///
    /// Uniqueness of username and email is checked later against the
    /// store; everything that can be decided from the payload alone is
    /// decided here.
    pub fn from_payload(payload: &Value) -> Result<Self, FieldErrors> {
        let mut reader = PayloadReader::new(payload);
        let username = reader.required("username");
        let email = reader.required("email");
        let password = reader.required("password");
        let first_name = reader.optional("first_name");
        let last_name = reader.optional("last_name");
        let phone = reader.optional("phone");
        let address = reader.optional("address");
        let mut errors = reader.into_errors();

        let registration = Self {
            username: username.unwrap_or_default(),
            email: email.unwrap_or_default(),
            password: password.unwrap_or_default(),
            first_name,
            last_name,
            phone,
            address,
        };

        if let Err(e) = registration.validate() {
            // A field already reported as missing or mistyped keeps only
            // that first message.
            let shape = from_validation_errors(&e);
            for field in shape.fields() {
                if !errors.contains(field) {
                    for message in shape.get(field).unwrap_or_default() {
                        errors.add(field, message.clone());
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(registration)
        } else {
            Err(errors)
        }
    }
}

/// Login credentials. Anything unusable is reported the same way as a
/// wrong password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let reader = PayloadReader::new(payload);
        Some(Self {
            username: reader.lenient("username")?,
            password: reader.lenient("password")?,
        })
    }
}
