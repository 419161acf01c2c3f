//! Progress API handlers
//!
//! Progress rows are unique per (user, lesson); callers may only write
//! their own records.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use lingua_auth::AuthUser;
use lingua_common::extractors::double_option;
use lingua_common::{Error, Pagination, Result, ValidatedJson};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::CatalogState;
use crate::domain::entities::Progress;

/// Request for creating a progress record
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProgressRequest {
    /// Owner; defaults to the caller when omitted
    pub user_id: Option<Uuid>,
    pub lesson_id: Uuid,

    #[serde(default)]
    pub completed: bool,
    pub score: Option<Decimal>,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Request for updating a progress record.
///
/// `score` and `completed_at` distinguish "absent" (keep) from "null"
/// (clear) via the double Option.
#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub score: Option<Option<Decimal>>,
    #[serde(default, deserialize_with = "double_option")]
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

/// Query params for listing progress records
#[derive(Debug, Deserialize)]
pub struct ListProgressQuery {
    pub user_id: Option<Uuid>,
    pub lesson_id: Option<Uuid>,
    pub completed: Option<bool>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Progress response DTO
#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub completed: bool,
    pub score: Option<Decimal>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<Progress> for ProgressResponse {
    fn from(p: Progress) -> Self {
        Self {
            id: p.id,
            user_id: p.user_id,
            lesson_id: p.lesson_id,
            completed: p.completed,
            score: p.score,
            completed_at: p.completed_at,
        }
    }
}

/// Create a new progress record
pub async fn create_progress(
    AuthUser(ctx): AuthUser,
    State(state): State<CatalogState>,
    ValidatedJson(req): ValidatedJson<CreateProgressRequest>,
) -> Result<(StatusCode, Json<ProgressResponse>)> {
    let user_id = req.user_id.unwrap_or(ctx.user.id);
    if !ctx.owns(user_id) {
        return Err(Error::Authorization(
            "Cannot record progress for another user".to_string(),
        ));
    }

    state
        .repos
        .lessons
        .find(req.lesson_id)
        .await?
        .ok_or_else(|| Error::Validation("Referenced lesson does not exist".to_string()))?;

    let progress = Progress::new(
        user_id,
        req.lesson_id,
        req.completed,
        req.score,
        req.completed_at,
    )?;

    let created = state.repos.progress.create(&progress).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List progress records
pub async fn list_progress(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    Query(query): Query<ListProgressQuery>,
) -> Result<Json<Vec<ProgressResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let records = state
        .repos
        .progress
        .list(
            query.user_id,
            query.lesson_id,
            query.completed,
            page.limit(),
            page.offset(),
        )
        .await?;

    let responses: Vec<ProgressResponse> = records.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single progress record by ID
pub async fn get_progress(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProgressResponse>> {
    let progress = state
        .repos
        .progress
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Progress record not found".to_string()))?;

    Ok(Json(progress.into()))
}

/// Update a progress record (owner only)
pub async fn update_progress(
    AuthUser(ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProgressRequest>,
) -> Result<Json<ProgressResponse>> {
    let existing = state
        .repos
        .progress
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Progress record not found".to_string()))?;

    if !ctx.owns(existing.user_id) {
        return Err(Error::Authorization(
            "Cannot modify another user's progress".to_string(),
        ));
    }

    if let Some(score) = req.score {
        Progress::validate_score(score)?;
    }

    let updated = state
        .repos
        .progress
        .update(id, req.completed, req.score, req.completed_at)
        .await?
        .ok_or_else(|| Error::NotFound("Progress record not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete a progress record (owner only)
pub async fn delete_progress(
    AuthUser(ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let existing = state
        .repos
        .progress
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Progress record not found".to_string()))?;

    if !ctx.owns(existing.user_id) {
        return Err(Error::Authorization(
            "Cannot delete another user's progress".to_string(),
        ));
    }

    state.repos.progress.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
