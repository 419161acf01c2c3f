//! User profile API handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use lingua_auth::AuthUser;
use lingua_common::extractors::double_option;
use lingua_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::UserProfile;

/// Request for creating a profile
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProfileRequest {
    /// Owner; defaults to the caller when omitted
    pub user_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    pub membership_date: Option<NaiveDate>,

    #[serde(default)]
    pub bio: String,

    #[serde(default)]
    pub is_tutor: bool,

    #[validate(url)]
    pub avatar_url: Option<String>,
}

/// Request for updating a profile.
///
/// `level_id` and `avatar_url` distinguish "absent" (keep) from "null"
/// (clear) via the double Option, since a learner's level can be unset.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub level_id: Option<Option<Uuid>>,

    pub membership_date: Option<NaiveDate>,
    pub bio: Option<String>,
    pub is_tutor: Option<bool>,

    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
}

/// Query params for listing profiles
#[derive(Debug, Deserialize)]
pub struct ListProfilesQuery {
    /// Filter by the level's CEFR code (e.g. `B1`)
    pub level_code: Option<String>,
    /// Free-text search over username and first/last names
    pub q: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Profile response DTO
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level_id: Option<Uuid>,
    pub membership_date: NaiveDate,
    pub bio: String,
    pub is_tutor: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileResponse {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            level_id: p.level_id,
            membership_date: p.membership_date,
            bio: p.bio,
            is_tutor: p.is_tutor,
            avatar_url: p.avatar_url,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

/// Create a profile
pub async fn create_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<CreateProfileRequest>,
) -> Result<(StatusCode, Json<ProfileResponse>)> {
    let user_id = req.user_id.unwrap_or(ctx.user.id);
    if !ctx.owns(user_id) {
        return Err(Error::Authorization(
            "Cannot create a profile for another user".to_string(),
        ));
    }

    let profile = UserProfile::new(
        user_id,
        req.level_id,
        req.membership_date,
        req.bio,
        req.is_tutor,
        req.avatar_url,
    );

    let created = state.repos.profiles.create(&profile).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List profiles
pub async fn list_profiles(
    AuthUser(_ctx): AuthUser,
    State(state): State<AccountsState>,
    Query(query): Query<ListProfilesQuery>,
) -> Result<Json<Vec<ProfileResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let profiles = state
        .repos
        .profiles
        .list(
            query.level_code.as_deref(),
            query.q.as_deref(),
            page.limit(),
            page.offset(),
        )
        .await?;

    let responses: Vec<ProfileResponse> = profiles.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single profile by ID
pub async fn get_profile(
    AuthUser(_ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .repos
        .profiles
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    Ok(Json(profile.into()))
}

/// Update a profile (owner only)
pub async fn update_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let existing = state
        .repos
        .profiles
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    if !ctx.owns(existing.user_id) {
        return Err(Error::Authorization(
            "Cannot modify another user's profile".to_string(),
        ));
    }

    let updated = state
        .repos
        .profiles
        .update(
            id,
            req.level_id,
            req.membership_date,
            req.bio,
            req.is_tutor,
            req.avatar_url,
        )
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete a profile (owner only)
pub async fn delete_profile(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let existing = state
        .repos
        .profiles
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Profile not found".to_string()))?;

    if !ctx.owns(existing.user_id) {
        return Err(Error::Authorization(
            "Cannot delete another user's profile".to_string(),
        ));
    }

    state.repos.profiles.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
