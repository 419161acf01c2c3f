//! User account API handlers
//!
//! Registration is the one write open to unauthenticated callers; every
//! other operation requires a bearer token, and accounts can only be
//! modified by their owner.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use lingua_auth::AuthUser;
use lingua_common::{hash_password, Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::User;

/// Request for registering a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,

    #[validate(email)]
    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[validate(length(min = 8))]
    pub password: String,
}

/// Request for updating an account
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(max = 150))]
    pub first_name: Option<String>,

    #[validate(length(max = 150))]
    pub last_name: Option<String>,

    /// Rotating the password rehashes it; the old hash is discarded
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

/// Query params for listing users
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// User response DTO — everything except the password hash
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Register a new user account (open)
pub async fn create_user(
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let password_hash = hash_password(&req.password)?;

    let user = User::new(
        req.username,
        req.email.unwrap_or_default(),
        req.first_name,
        req.last_name,
        password_hash,
    )?;

    let created = state.repos.users.create(&user).await?;

    tracing::info!(user_id = %created.id, username = %created.username, "User registered");

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List users
pub async fn list_users(
    AuthUser(_ctx): AuthUser,
    State(state): State<AccountsState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<Vec<UserResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let users = state.repos.users.list(page.limit(), page.offset()).await?;

    let responses: Vec<UserResponse> = users.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single user by ID
pub async fn get_user(
    AuthUser(_ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>> {
    let user = state
        .repos
        .users
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(user.into()))
}

/// Update an account (owner only)
pub async fn update_user(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>> {
    if !ctx.owns(id) {
        return Err(Error::Authorization(
            "Cannot modify another user's account".to_string(),
        ));
    }

    let password_hash = match req.password {
        Some(ref password) => Some(hash_password(password)?),
        None => None,
    };

    let updated = state
        .repos
        .users
        .update(id, req.email, req.first_name, req.last_name, password_hash)
        .await?
        .ok_or_else(|| Error::NotFound("User not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete an account (owner only)
pub async fn delete_user(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if !ctx.owns(id) {
        return Err(Error::Authorization(
            "Cannot delete another user's account".to_string(),
        ));
    }

    let deleted = state.repos.users.delete(id).await?;
    if !deleted {
        return Err(Error::NotFound("User not found".to_string()));
    }

    tracing::info!(user_id = %id, "User account deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_user_request_validation() {
        let valid = CreateUserRequest {
            username: "ana".to_string(),
            email: Some("ana@example.com".to_string()),
            first_name: "Ana".to_string(),
            last_name: "García".to_string(),
            password: "long enough".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short_password = CreateUserRequest {
            password: "short".to_string(),
            ..valid_request()
        };
        assert!(short_password.validate().is_err());

        let bad_email = CreateUserRequest {
            email: Some("not-an-email".to_string()),
            ..valid_request()
        };
        assert!(bad_email.validate().is_err());
    }

    fn valid_request() -> CreateUserRequest {
        CreateUserRequest {
            username: "ana".to_string(),
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            password: "long enough".to_string(),
        }
    }

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::new(
            "ana".to_string(),
            "ana@example.com".to_string(),
            String::new(),
            String::new(),
            "salt:hash".to_string(),
        )
        .unwrap();

        let json = serde_json::to_string(&UserResponse::from(user)).unwrap();
        assert!(json.contains("ana"));
        assert!(!json.contains("salt:hash"));
        assert!(!json.contains("password"));
    }
}
