//! Registration, login, and the bearer-token middleware.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use debtfolio_core::credentials::CredentialInput;
use debtfolio_core::errors::Error;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{ApiResponse, AuthData},
};

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialInput>,
) -> ApiResult<(StatusCode, Json<ApiResponse<AuthData>>)> {
    let session = state.credential_service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(session.into()))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CredentialInput>,
) -> ApiResult<Json<ApiResponse<AuthData>>> {
    let session = state.credential_service.login(payload).await?;
    Ok(Json(ApiResponse::ok(session.into())))
}

/// Reject any request that does not carry a valid bearer token, and
/// expose the verified claims to handlers via request extensions.
pub async fn require_jwt(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("missing bearer token".into()))?;

    let mut parts = header.splitn(2, ' ');
    let (Some(scheme), Some(token)) = (parts.next(), parts.next()) else {
        return Err(Error::Unauthorized("malformed authorization header".into()).into());
    };
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(Error::Unauthorized("malformed authorization header".into()).into());
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(Error::Unauthorized("missing bearer token".into()).into());
    }

    let claims = state.credential_service.verify_token(token)?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// Accept the signing secret as base64 or as a raw 32-byte ASCII value.
pub fn decode_secret_key(raw: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        anyhow::bail!("JWT secret cannot be empty");
    }
    let decoded = match BASE64.decode(trimmed) {
        Ok(bytes) => bytes,
        Err(_) if trimmed.len() == 32 => trimmed.as_bytes().to_vec(),
        Err(_) => {
            anyhow::bail!("JWT secret must be base64 encoded or a 32-byte ASCII string")
        }
    };

    if decoded.len() != 32 {
        anyhow::bail!("JWT secret must decode to exactly 32 bytes");
    }

    Ok(decoded)
}
