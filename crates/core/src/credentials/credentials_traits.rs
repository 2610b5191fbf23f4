use crate::credentials::credentials_model::{AuthSession, CredentialInput};
use crate::credentials::token::Claims;
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for credential service operations
#[async_trait]
pub trait CredentialServiceTrait: Send + Sync {
    /// Create an account. Fails with `Conflict` when the email is
    /// already registered (case-insensitive).
    async fn register(&self, input: CredentialInput) -> Result<AuthSession>;

    /// Authenticate. Fails with `InvalidCredentials` on an unknown email
    /// or a wrong password, indistinguishably.
    async fn login(&self, input: CredentialInput) -> Result<AuthSession>;

    /// Verify a presented bearer token and return its claims.
    fn verify_token(&self, token: &str) -> Result<Claims>;
}
