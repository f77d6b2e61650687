// Configuration management

use crate::core::errors::ShieldError;
use secrecy::{ExposeSecret, Secret};
use std::env;
use std::time::Duration;

/// Application configuration loaded from environment variables
///
/// Secrets stay wrapped in `Secret` so they never reach `Debug` output.
/// All values are validated on load.
#[derive(Debug)]
pub struct Config {
    // Server configuration
    pub bind_address: String,
    pub port: u16,

    // Database configuration
    pub database_url: Secret<String>,
    pub database_max_connections: u32,

    // Cryptographic configuration
    pub jwt_secret: Secret<String>,
    pub encryption_key: Secret<String>,
    pub bcrypt_cost: u32,

    // Token lifetimes
    pub login_token_ttl_secs: u64,
    pub register_token_ttl_secs: u64,

    // Middleware configuration
    pub request_timeout_secs: u64,
    pub body_size_limit_bytes: usize,

    // Logging configuration
    pub log_level: String,
    pub log_format: String, // "json" or "text"
}

const ENCRYPTION_KEY_HEX_LEN: usize = 64;

/// Cost bounds accepted by bcrypt
pub const BCRYPT_MIN_COST: u32 = 4;
pub const BCRYPT_MAX_COST: u32 = 31;

impl Config {
    /// Load configuration from the process environment
    ///
    /// A `.env` file is honoured in development.
    pub fn from_env() -> Result<Self, ShieldError> {
        #[cfg(not(test))]
        {
            dotenv::dotenv().ok();
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ShieldError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = EnvReader { lookup };

        let config = Self {
            bind_address: env.string_or("BIND_ADDRESS", "0.0.0.0"),
            port: env.parse_or("PORT", 8000u16)?,
            database_url: Secret::new(env.required("DATABASE_URL")?),
            database_max_connections: env.parse_or("DATABASE_MAX_CONNECTIONS", 10u32)?,
            jwt_secret: Secret::new(env.required("JWT_SECRET")?),
            encryption_key: Secret::new(env.required("ENCRYPTION_KEY")?),
            bcrypt_cost: env.parse_or("BCRYPT_COST", 10u32)?,
            login_token_ttl_secs: env.parse_or("LOGIN_TOKEN_TTL_SECS", 3600u64)?,
            register_token_ttl_secs: env.parse_or("REGISTER_TOKEN_TTL_SECS", 30 * 24 * 3600u64)?,
            request_timeout_secs: env.parse_or("REQUEST_TIMEOUT_SECS", 30u64)?,
            body_size_limit_bytes: env.parse_or("BODY_SIZE_LIMIT_BYTES", 1024 * 1024usize)?,
            log_level: env.string_or("LOG_LEVEL", "info"),
            log_format: env.string_or("LOG_FORMAT", "json"),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn login_token_ttl(&self) -> Duration {
        Duration::from_secs(self.login_token_ttl_secs)
    }

    pub fn register_token_ttl(&self) -> Duration {
        Duration::from_secs(self.register_token_ttl_secs)
    }

    /// Validate all configuration values
    fn validate(&self) -> Result<(), ShieldError> {
        Self::validate_url(self.database_url.expose_secret(), "Database URL")?;

        let key = self.encryption_key.expose_secret();
        if key.len() != ENCRYPTION_KEY_HEX_LEN || !key.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ShieldError::Configuration(format!(
                "ENCRYPTION_KEY must be {} hex characters",
                ENCRYPTION_KEY_HEX_LEN
            )));
        }

        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&self.bcrypt_cost) {
            return Err(ShieldError::Configuration(format!(
                "BCRYPT_COST must be between {} and {}",
                BCRYPT_MIN_COST,
                BCRYPT_MAX_COST
            )));
        }

        Self::validate_log_level(&self.log_level)?;
        Self::validate_log_format(&self.log_format)?;

        Ok(())
    }

    /// Validate URL format; the URL itself is never echoed
    fn validate_url(url: &str, description: &str) -> Result<(), ShieldError> {
        url::Url::parse(url).map_err(|e| {
            ShieldError::Configuration(format!("Invalid {}: {}", description, e))
        })?;
        Ok(())
    }

    fn validate_log_level(level: &str) -> Result<(), ShieldError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&level.to_lowercase().as_str()) {
            return Err(ShieldError::Configuration(format!(
                "Invalid LOG_LEVEL '{}': must be one of {}",
                level,
                valid_levels.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_log_format(format: &str) -> Result<(), ShieldError> {
        if format != "json" && format != "text" {
            return Err(ShieldError::Configuration(format!(
                "Invalid LOG_FORMAT '{}': must be 'json' or 'text'",
                format
            )));
        }
        Ok(())
    }

    /// Configuration for tests: fixed secrets, cheapest bcrypt cost
    pub fn test_config() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8000,
            database_url: Secret::new("postgresql://localhost/sentinel_test".to_string()),
            database_max_connections: 2,
            jwt_secret: Secret::new("test-jwt-secret-for-unit-tests".to_string()),
            encryption_key: Secret::new(
                "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f".to_string(),
            ),
            bcrypt_cost: BCRYPT_MIN_COST,
            login_token_ttl_secs: 3600,
            register_token_ttl_secs: 30 * 24 * 3600,
            request_timeout_secs: 30,
            body_size_limit_bytes: 1024 * 1024,
            log_level: "info".to_string(),
            log_format: "json".to_string(),
        }
    }
}

/// Typed reads over a key lookup
struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    fn required(&self, key: &str) -> Result<String, ShieldError> {
        self.get(key)
            .ok_or_else(|| ShieldError::Configuration(format!("{} not set", key)))
    }

    /// Parse a positive number, falling back to `default` when unset
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ShieldError>
    where
        T: std::str::FromStr + PartialEq + Default,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };

        let parsed = value.parse::<T>().map_err(|e| {
            ShieldError::Configuration(format!("Invalid {} value '{}': {}", key, value, e))
        })?;

        if parsed == T::default() {
            return Err(ShieldError::Configuration(format!(
                "{} must be greater than 0",
                key
            )));
        }

        Ok(parsed)
    }
}
