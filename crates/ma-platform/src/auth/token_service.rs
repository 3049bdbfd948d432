//! Session token verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::shared::error::{PlatformError, Result};

/// Claims of a meetapp session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub sub: String,
    pub iss: String,
    pub aud: String,
    pub exp: i64,
    pub iat: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    audience: String,
}

impl TokenService {
    pub fn new(secret: &str, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Validate a session token and return its claims.
    pub fn validate(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => PlatformError::TokenExpired,
                _ => PlatformError::InvalidToken { message: format!("{}", e) },
            })
    }

    /// Sign a token for `user_id`. Used by the development seeder and tests;
    /// production sessions come from the external auth service.
    pub fn issue(&self, user_id: &str, ttl: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id.to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| PlatformError::internal(format!("Failed to sign token: {}", e)))
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test-secret", "meetapp", "meetapp")
    }

    #[test]
    fn test_issue_and_validate() {
        let svc = service();
        let token = svc.issue("0HZXEQ5Y8JY5Z", Duration::hours(1)).unwrap();
        let claims = svc.validate(&token).unwrap();
        assert_eq!(claims.sub, "0HZXEQ5Y8JY5Z");
    }

    #[test]
    fn test_expired_token() {
        let svc = service();
        let token = svc.issue("user", Duration::hours(-2)).unwrap();
        assert!(matches!(svc.validate(&token), Err(PlatformError::TokenExpired)));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let other = TokenService::new("test-secret", "meetapp", "someone-else");
        let token = other.issue("user", Duration::hours(1)).unwrap();
        assert!(matches!(service().validate(&token), Err(PlatformError::InvalidToken { .. })));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let other = TokenService::new("another-secret", "meetapp", "meetapp");
        let token = other.issue("user", Duration::hours(1)).unwrap();
        assert!(service().validate(&token).is_err());
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }
}
