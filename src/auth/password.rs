// Password hashing and verification (bcrypt on the blocking pool)

use crate::core::errors::ShieldError;
use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Plaintext password with memory protection
///
/// Never printed through `Debug` or `Display`.
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: &str) -> Self {
        Self(Secret::new(password.to_string()))
    }

    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Hash with bcrypt at `cost`
    pub async fn hash(self, cost: u32) -> Result<String, ShieldError> {
        tokio::task::spawn_blocking(move || bcrypt::hash(self.expose_secret(), cost))
            .await
            .map_err(|e| ShieldError::Internal(format!("Hashing task failed: {}", e)))?
            .map_err(|e| ShieldError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Compare against a stored bcrypt hash
    ///
    /// A malformed stored hash counts as a mismatch.
    pub async fn verify(self, stored_hash: &str) -> Result<bool, ShieldError> {
        let stored_hash = stored_hash.to_string();
        let matched = tokio::task::spawn_blocking(move || {
            bcrypt::verify(self.expose_secret(), &stored_hash).unwrap_or(false)
        })
        .await
        .map_err(|e| ShieldError::Internal(format!("Verification task failed: {}", e)))?;
        Ok(matched)
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("value", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}
