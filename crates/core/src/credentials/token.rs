//! Session token signing and verification.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Claims embedded in a session token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User identifier.
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

/// Signing and verification keys plus the token lifetime, built once at
/// startup from process-wide configuration and immutable thereafter.
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], token_ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        // An expired token is rejected the moment its expiry passes.
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            token_ttl,
        }
    }

    /// Sign a token over the user identity with the configured expiry.
    pub fn issue_token(&self, user_id: &str, email: &str) -> Result<String> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::Unexpected("System clock is before UNIX_EPOCH".into()))?;
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            iat: now.as_secs() as usize,
            exp: (now + self.token_ttl).as_secs() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| Error::Unexpected(format!("Failed to sign token: {e}")))
    }

    /// Decode and verify a token. A tampered or expired token fails
    /// wholesale; no claim from it is ever trusted.
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => Error::Unauthorized("token expired".into()),
                _ => Error::Unauthorized("invalid token".into()),
            })
    }

    pub fn expires_in(&self) -> Duration {
        self.token_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"0123456789abcdef0123456789abcdef";

    fn keys() -> TokenKeys {
        TokenKeys::new(SECRET, Duration::from_secs(3600))
    }

    #[test]
    fn round_trips_claims() {
        let keys = keys();
        let token = keys.issue_token("user-1", "ada@example.com").unwrap();
        let claims = keys.verify_token(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "ada@example.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn rejects_expired_token() {
        let keys = keys();
        let past = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as usize
            - 120;
        let claims = Claims {
            sub: "user-1".to_string(),
            email: "ada@example.com".to_string(),
            iat: past - 60,
            exp: past,
        };
        let stale = encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap();
        let err = keys.verify_token(&stale).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = TokenKeys::new(b"another-secret-another-secret!!!", Duration::from_secs(3600))
            .issue_token("user-1", "ada@example.com")
            .unwrap();
        assert!(matches!(
            keys().verify_token(&token),
            Err(Error::Unauthorized(_))
        ));
    }

    #[test]
    fn rejects_garbage_token() {
        assert!(matches!(
            keys().verify_token("not.a.token"),
            Err(Error::Unauthorized(_))
        ));
    }
}
