// Domain error types - Secure error handling with no information disclosure

use thiserror::Error;

/// Main error type for the service
#[derive(Error, Debug)]
pub enum ShieldError {
    /// Malformed or missing input (HTTP 400)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Resource already exists, e.g. duplicate registration (HTTP 400)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Unknown email or wrong password on login (HTTP 401)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, invalid or expired bearer token (HTTP 401)
    #[error("Authentication failed: {0}")]
    Unauthenticated(#[from] TokenError),

    /// Ownership or plan-tier violation (HTTP 403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Resource missing or not owned by the caller (HTTP 404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Cryptographic error (HTTP 500)
    #[error("Cryptographic error: {0}")]
    Crypto(#[from] CryptoError),

    /// Persistence error (HTTP 500)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error (HTTP 500)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Anything else (HTTP 500)
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Bearer token errors
///
/// Every variant surfaces to callers as a plain 401.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("No token provided")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    Expired,

    #[error("Invalid token payload structure")]
    InvalidPayload,

    #[error("Failed to sign token: {0}")]
    Signing(String),

    #[error("Signing secret is not configured")]
    MissingSecret,
}

/// Symmetric cipher errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Encryption key is not 64 hex characters
    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    /// Envelope could not be parsed or failed tag verification
    #[error("Invalid encrypted data: {0}")]
    InvalidCiphertext(String),

    #[error("Encryption failed")]
    EncryptionFailed,
}

impl ShieldError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ShieldError::Validation(_) => 400,
            ShieldError::Conflict(_) => 400,
            ShieldError::InvalidCredentials => 401,
            ShieldError::Unauthenticated(_) => 401,
            ShieldError::Forbidden(_) => 403,
            ShieldError::NotFound(_) => 404,
            ShieldError::Crypto(_) => 500,
            ShieldError::Database(_) => 500,
            ShieldError::Configuration(_) => 500,
            ShieldError::Internal(_) => 500,
        }
    }

    /// Get user-friendly error message (no sensitive information)
    pub fn user_message(&self) -> String {
        match self {
            ShieldError::Validation(msg) => msg.clone(),
            ShieldError::Conflict(msg) => msg.clone(),
            ShieldError::InvalidCredentials => "Invalid credentials".to_string(),
            ShieldError::Unauthenticated(_) => "Unauthorized".to_string(),
            ShieldError::Forbidden(msg) => msg.clone(),
            ShieldError::NotFound(msg) => msg.clone(),
            ShieldError::Crypto(_)
            | ShieldError::Database(_)
            | ShieldError::Configuration(_)
            | ShieldError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Whether this error is an unexpected server-side failure
    pub fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}
