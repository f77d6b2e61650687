// Axum authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::responses::ApiError;
use crate::auth::headers::AccessorHeaders;
use crate::core::errors::ShieldError;
use crate::core::token::TokenCodec;

/// Authentication middleware function
///
/// Verifies the bearer token from the `Authorization` header and stores the
/// caller's `Identity` in request extensions for handlers to use. Every
/// failure is answered with a uniform 401.
pub async fn auth_middleware(
    State(token_codec): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = match token_codec.verify(&AccessorHeaders(request.headers())) {
        Ok(identity) => identity,
        Err(e) => {
            warn!(
                reason = %e,
                path = %request.uri().path(),
                user_agent = ?extract_user_agent(&request),
                "Authentication failed"
            );
            return Err(ShieldError::Unauthenticated(e).into());
        }
    };

    debug!(user_id = %identity.id, path = %request.uri().path(), "Authenticated request");

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

/// Extract user agent from request headers
fn extract_user_agent(request: &Request) -> Option<String> {
    request
        .headers()
        .get("User-Agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}
