// Bearer identity tokens: HS256 JWT issue and verification

use crate::auth::headers::{bearer_token, HeaderSource};
use crate::core::errors::TokenError;
use crate::core::models::Identity;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

/// Claims written into every issued token
#[derive(Debug, Serialize)]
struct TokenClaims<'a> {
    id: &'a str,
    email: &'a str,
    iat: i64,
    exp: i64,
}

/// Issues and verifies identity tokens with a process-wide signing secret
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Create a codec from the signing secret
    ///
    /// An empty secret is rejected; callers treat that as fatal at startup.
    pub fn new(secret: &str) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    /// Sign a token binding `identity` that expires after `ttl`
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs())
            .map_err(|_| TokenError::Signing("TTL out of range".to_string()))?;

        let claims = TokenClaims {
            id: &identity.id,
            email: &identity.email,
            iat: now,
            exp: now.saturating_add(ttl_secs),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify the bearer token carried by a request's headers
    pub fn verify<H: HeaderSource + ?Sized>(&self, headers: &H) -> Result<Identity, TokenError> {
        let authorization = headers.header("authorization");
        let token = bearer_token(authorization.as_deref()).ok_or(TokenError::MissingToken)?;
        self.verify_token(token)
    }

    /// Verify a raw token string
    ///
    /// The payload must carry string `id` and `email` fields.
    pub fn verify_token(&self, token: &str) -> Result<Identity, TokenError> {
        let data = decode::<Value>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidToken,
            }
        })?;

        let claims = data.claims;
        match (
            claims.get("id").and_then(Value::as_str),
            claims.get("email").and_then(Value::as_str),
        ) {
            (Some(id), Some(email)) => Ok(Identity {
                id: id.to_string(),
                email: email.to_string(),
            }),
            _ => Err(TokenError::InvalidPayload),
        }
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}
