//! Level membership API handlers
//!
//! Memberships are append-only history; updates only move the date range.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use lingua_auth::AuthUser;
use lingua_common::extractors::double_option;
use lingua_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::AccountsState;
use crate::domain::entities::LevelMembership;

/// Request for creating a membership record
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMembershipRequest {
    /// Owner; defaults to the caller when omitted
    pub user_id: Option<Uuid>,
    pub level_id: Uuid,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

/// Request for updating a membership record
#[derive(Debug, Deserialize)]
pub struct UpdateMembershipRequest {
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "double_option")]
    pub end_date: Option<Option<NaiveDate>>,
}

/// Query params for listing memberships
#[derive(Debug, Deserialize)]
pub struct ListMembershipsQuery {
    pub user_id: Option<Uuid>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Membership response DTO
#[derive(Debug, Serialize)]
pub struct MembershipResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl From<LevelMembership> for MembershipResponse {
    fn from(m: LevelMembership) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            level_id: m.level_id,
            start_date: m.start_date,
            end_date: m.end_date,
        }
    }
}

/// Create a membership record
pub async fn create_membership(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    ValidatedJson(req): ValidatedJson<CreateMembershipRequest>,
) -> Result<(StatusCode, Json<MembershipResponse>)> {
    let user_id = req.user_id.unwrap_or(ctx.user.id);
    if !ctx.owns(user_id) {
        return Err(Error::Authorization(
            "Cannot record membership for another user".to_string(),
        ));
    }

    let membership =
        LevelMembership::new(user_id, req.level_id, req.start_date, req.end_date)?;

    let created = state.repos.memberships.create(&membership).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List membership records, most recent first
pub async fn list_memberships(
    AuthUser(_ctx): AuthUser,
    State(state): State<AccountsState>,
    Query(query): Query<ListMembershipsQuery>,
) -> Result<Json<Vec<MembershipResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let memberships = state
        .repos
        .memberships
        .list(query.user_id, page.limit(), page.offset())
        .await?;

    let responses: Vec<MembershipResponse> = memberships.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single membership record by ID
pub async fn get_membership(
    AuthUser(_ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MembershipResponse>> {
    let membership = state
        .repos
        .memberships
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Membership not found".to_string()))?;

    Ok(Json(membership.into()))
}

/// Update a membership's date range (owner only)
pub async fn update_membership(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMembershipRequest>,
) -> Result<Json<MembershipResponse>> {
    let existing = state
        .repos
        .memberships
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Membership not found".to_string()))?;

    if !ctx.owns(existing.user_id) {
        return Err(Error::Authorization(
            "Cannot modify another user's membership".to_string(),
        ));
    }

    // The resulting range must stay ordered
    let new_start = req.start_date.unwrap_or(existing.start_date);
    let new_end = match req.end_date {
        Some(end) => end,
        None => existing.end_date,
    };
    if let Some(end) = new_end {
        if end < new_start {
            return Err(Error::Validation(
                "Membership end date must not precede its start date".to_string(),
            ));
        }
    }

    let updated = state
        .repos
        .memberships
        .update(id, req.start_date, req.end_date)
        .await?
        .ok_or_else(|| Error::NotFound("Membership not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete a membership record (owner only)
pub async fn delete_membership(
    AuthUser(ctx): AuthUser,
    State(state): State<AccountsState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let existing = state
        .repos
        .memberships
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Membership not found".to_string()))?;

    if !ctx.owns(existing.user_id) {
        return Err(Error::Authorization(
            "Cannot delete another user's membership".to_string(),
        ));
    }

    state.repos.memberships.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
