use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use crate::credentials::credentials_model::{AuthSession, CredentialInput, CredentialRecord};
use crate::credentials::credentials_traits::CredentialServiceTrait;
use crate::credentials::password::{hash_password, verify_password};
use crate::credentials::token::{Claims, TokenKeys};
use crate::errors::{Error, Result};
use crate::storage::EntityStore;

pub struct CredentialService {
    credential_store: Arc<dyn EntityStore<CredentialRecord>>,
    token_keys: Arc<TokenKeys>,
}

impl CredentialService {
    pub fn new(
        credential_store: Arc<dyn EntityStore<CredentialRecord>>,
        token_keys: Arc<TokenKeys>,
    ) -> Self {
        Self {
            credential_store,
            token_keys,
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<CredentialRecord>> {
        let records = self.credential_store.list().await?;
        Ok(records.into_iter().find(|record| record.email == email))
    }

    fn session_for(&self, record: CredentialRecord) -> Result<AuthSession> {
        let token = self.token_keys.issue_token(&record.id, &record.email)?;
        Ok(AuthSession {
            record,
            token,
            expires_in: self.token_keys.expires_in().as_secs(),
        })
    }
}

#[async_trait]
impl CredentialServiceTrait for CredentialService {
    async fn register(&self, input: CredentialInput) -> Result<AuthSession> {
        input.validate()?;
        let email = input.email.trim().to_ascii_lowercase();
        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict(format!(
                "an account for '{email}' already exists"
            )));
        }

        let now = Utc::now();
        let record = CredentialRecord {
            id: String::new(),
            email,
            password_hash: hash_password(&input.password)?,
            created_at: now,
            updated_at: now,
        };
        let record = self.credential_store.save(record).await?;
        debug!("Registered account {}", record.id);
        self.session_for(record)
    }

    async fn login(&self, input: CredentialInput) -> Result<AuthSession> {
        let email = input.email.trim().to_ascii_lowercase();
        // Unknown email and wrong password produce the same failure.
        let record = self
            .find_by_email(&email)
            .await?
            .ok_or(Error::InvalidCredentials)?;
        if !verify_password(&input.password, &record.password_hash)? {
            return Err(Error::InvalidCredentials);
        }
        self.session_for(record)
    }

    fn verify_token(&self, token: &str) -> Result<Claims> {
        self.token_keys.verify_token(token)
    }
}
