//! Core error types for the Debtfolio application.
//!
//! This module defines storage-agnostic error types. Backend-specific
//! failures (filesystem, HTTP, hosted service) are converted to these
//! types by the storage layer.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the application.
///
/// Every kind here is recoverable by the caller; the request-handling
/// boundary maps each kind onto a response status. Unrecognized failures
/// are wrapped as `Unexpected`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{0} not found")]
    NotFound(String),

    /// Invalid, expired, or missing session token.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Login or registration failure. Deliberately carries no detail on
    /// whether the email or the password was at fault.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The storage backend cannot be reached. Not retried internally.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Missing configuration key: {0}")]
    MissingConfigKey(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// A single field-level constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

/// Validation failure carrying every field-level violation found in a
/// payload. Validation is all-or-nothing: a payload with any violation
/// is rejected wholesale and never partially applied.
#[derive(Debug, Default)]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation against a field path, e.g. `plans[2].totalAmount`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Finish a validation pass: `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> std::result::Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for violation in &self.violations {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", violation.field, violation.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
