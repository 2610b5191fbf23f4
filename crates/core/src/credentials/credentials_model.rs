//! Credential domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MIN_PASSWORD_LENGTH;
use crate::errors::ValidationError;
use crate::storage::StoredEntity;

/// A registered account. Created on registration, read on login, never
/// mutated otherwise. The email is unique (case-insensitive).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    #[serde(default)]
    pub id: String,
    pub email: String,
    /// PHC-format argon2 hash. Never exposed on the HTTP surface.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StoredEntity for CredentialRecord {
    const COLLECTION: &'static str = "credentials";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// Registration / login payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialInput {
    pub email: String,
    pub password: String,
}

impl CredentialInput {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut err = ValidationError::new();
        match self.email.trim().split_once('@') {
            Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
            _ => err.add("email", "must be a valid email address"),
        }
        if self.password.len() < MIN_PASSWORD_LENGTH {
            err.add(
                "password",
                format!("must be at least {MIN_PASSWORD_LENGTH} characters"),
            );
        }
        err.into_result()
    }
}

/// A successful registration or login: the account plus a freshly
/// signed session token.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub record: CredentialRecord,
    pub token: String,
    pub expires_in: u64,
}
