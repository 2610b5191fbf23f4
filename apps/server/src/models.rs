//! Wire models: the uniform response envelope and auth payloads.

use chrono::{DateTime, Utc};
use serde::Serialize;

use debtfolio_core::credentials::{AuthSession, CredentialRecord};

/// Uniform response envelope used by every endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            message: Some(message.into()),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
        }
    }
}

/// Account as exposed on the wire. The password hash never leaves the
/// server.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CredentialRecord> for UserProfile {
    fn from(record: CredentialRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    pub user: UserProfile,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

impl From<AuthSession> for AuthData {
    fn from(session: AuthSession) -> Self {
        Self {
            user: session.record.into(),
            access_token: session.token,
            token_type: "Bearer".to_string(),
            expires_in: session.expires_in,
        }
    }
}
