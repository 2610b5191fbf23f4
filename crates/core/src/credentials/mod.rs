//! Credentials module - password hashing, session tokens, registration
//! and login.

mod credentials_model;
mod credentials_service;
mod credentials_traits;
mod password;
mod token;

pub use credentials_model::{AuthSession, CredentialInput, CredentialRecord};
pub use credentials_service::CredentialService;
pub use credentials_traits::CredentialServiceTrait;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenKeys};
