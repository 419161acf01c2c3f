//! JWT issuance, validation, and token extraction helpers

use axum::http::HeaderValue;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::claims::Claims;
use crate::config::AuthConfig;
use crate::error::AuthError;

/// Issue a signed bearer token for a user.
///
/// The login endpoint is the only caller; every other component only
/// validates.
pub fn issue_token(
    user_id: Uuid,
    username: &str,
    config: &AuthConfig,
) -> Result<String, AuthError> {
    let now = chrono::Utc::now().timestamp() as u64;
    let claims = Claims {
        sub: user_id.to_string(),
        username: username.to_string(),
        iat: now,
        exp: now + config.token_ttl_secs,
    };

    let header = Header::new(Algorithm::HS256);
    let encoding_key = EncodingKey::from_secret(config.jwt_secret.as_ref());

    encode(&header, &claims, &encoding_key).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode JWT");
        AuthError::AuthenticationFailed
    })
}

/// Validate a bearer token and return its claims
pub(crate) fn validate_token(token: &str, config: &AuthConfig) -> Result<Claims, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    let decoding_key = DecodingKey::from_secret(config.jwt_secret.as_ref());

    let token_data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        AuthError::InvalidToken
    })?;

    Ok(token_data.claims)
}

/// Extract bearer token from Authorization header
pub(crate) fn extract_bearer_token(header: &HeaderValue) -> Result<String, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    if let Some(token) = header_str.strip_prefix("Bearer ") {
        Ok(token.to_string())
    } else {
        Err(AuthError::InvalidAuthorizationFormat)
    }
}
