//! Login handler
//!
//! Exchanges username + password for a signed bearer token. Wrong
//! username and wrong password are deliberately the same error.

use axum::{extract::State, Json};
use lingua_auth::issue_token;
use lingua_common::{verify_password, Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::handlers::users::UserResponse;
use crate::api::middleware::AccountsState;

/// Request for logging in
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

/// Response for a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Authenticate and issue a bearer token (open)
pub async fn login(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let user = state
        .repos
        .users
        .find_by_username(&req.username)
        .await?
        .ok_or_else(|| Error::Authentication("Invalid username or password".to_string()))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(Error::Authentication(
            "Invalid username or password".to_string(),
        ));
    }

    let token = issue_token(user.id, &user.username, state.auth.config())
        .map_err(|_| Error::Internal("Failed to issue token".to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}
