// Registration and login

use axum::{extract::State, response::Json};
use serde::Deserialize;
use tracing::{info, warn};

use crate::api::responses::{ApiError, ApiJson, AuthResponse};
use crate::api::AppState;
use crate::auth::password::Password;
use crate::core::errors::ShieldError;
use crate::core::models::NewUser;
use crate::utils::validation::{validate_email, validate_name, validate_password};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// POST /user/register
///
/// Validates the submitted fields, rejects duplicate emails, stores a bcrypt
/// hash and returns a long-lived token.
pub async fn register_handler(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (email, password, name) = match (
        request.email.as_deref(),
        request.password.as_deref(),
        request.name.as_deref(),
    ) {
        (Some(email), Some(password), Some(name))
            if !email.is_empty() && !password.is_empty() && !name.is_empty() =>
        {
            (email, password, name)
        }
        _ => {
            return Err(ShieldError::Validation("All fields are required".to_string()).into());
        }
    };

    validate_email(email)?;
    validate_password(password)?;
    validate_name(name)?;

    if app_state.users.find_user_by_email(email).await?.is_some() {
        return Err(ShieldError::Conflict("User already exists".to_string()).into());
    }

    let password_hash = Password::new(password)
        .hash(app_state.config.bcrypt_cost)
        .await?;

    let user = app_state
        .users
        .create_user(NewUser {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.to_string(),
            password_hash,
            name: name.to_string(),
        })
        .await?;

    let token = app_state
        .token_codec
        .issue(&user.identity(), app_state.config.register_token_ttl())
        .map_err(|e| ShieldError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "User registered");

    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}

/// POST /user/auth
///
/// Unknown email and wrong password are indistinguishable to the caller.
pub async fn login_handler(
    State(app_state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (email, password) = match (request.email.as_deref(), request.password.as_deref()) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            (email, password)
        }
        _ => {
            return Err(
                ShieldError::Validation("Email and password are required".to_string()).into(),
            );
        }
    };

    let Some(user) = app_state.users.find_user_by_email(email).await? else {
        warn!("Login attempt for unknown account");
        return Err(ShieldError::InvalidCredentials.into());
    };

    if !Password::new(password).verify(&user.password_hash).await? {
        warn!(user_id = %user.id, "Login attempt with wrong password");
        return Err(ShieldError::InvalidCredentials.into());
    }

    let token = app_state
        .token_codec
        .issue(&user.identity(), app_state.config.login_token_ttl())
        .map_err(|e| ShieldError::Internal(e.to_string()))?;

    info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        token,
        user: user.profile(),
    }))
}
