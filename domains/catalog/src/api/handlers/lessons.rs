//! Lesson management API handlers
//!
//! Reads are open; writes require a bearer token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use lingua_auth::AuthUser;
use lingua_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::CatalogState;
use crate::domain::entities::Lesson;

/// Request for creating a lesson
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLessonRequest {
    pub level_id: Uuid,

    #[validate(length(min = 1, max = 200))]
    pub title: String,

    #[serde(default)]
    pub content: String,

    /// Ordering rank within the level
    #[serde(default)]
    pub position: i32,
}

/// Request for updating a lesson
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLessonRequest {
    pub level_id: Option<Uuid>,

    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,

    pub content: Option<String>,
    pub position: Option<i32>,
}

/// Query params for listing lessons
#[derive(Debug, Deserialize)]
pub struct ListLessonsQuery {
    pub level_id: Option<Uuid>,
    /// Free-text search over title and content
    pub q: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Lesson response DTO
#[derive(Debug, Serialize)]
pub struct LessonResponse {
    pub id: Uuid,
    pub level_id: Uuid,
    pub title: String,
    pub content: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Lesson> for LessonResponse {
    fn from(l: Lesson) -> Self {
        Self {
            id: l.id,
            level_id: l.level_id,
            title: l.title,
            content: l.content,
            position: l.position,
            created_at: l.created_at,
        }
    }
}

/// Create a new lesson
pub async fn create_lesson(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    ValidatedJson(req): ValidatedJson<CreateLessonRequest>,
) -> Result<(StatusCode, Json<LessonResponse>)> {
    // Referenced level must exist; surface a clear client error rather
    // than a raw foreign-key failure
    state
        .repos
        .levels
        .find(req.level_id)
        .await?
        .ok_or_else(|| Error::Validation("Referenced level does not exist".to_string()))?;

    let lesson = Lesson::new(req.level_id, req.title, req.content, req.position)?;
    let created = state.repos.lessons.create(&lesson).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List lessons (open)
pub async fn list_lessons(
    State(state): State<CatalogState>,
    Query(query): Query<ListLessonsQuery>,
) -> Result<Json<Vec<LessonResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let lessons = state
        .repos
        .lessons
        .list(
            query.level_id,
            query.q.as_deref(),
            page.limit(),
            page.offset(),
        )
        .await?;

    let responses: Vec<LessonResponse> = lessons.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single lesson by ID (open)
pub async fn get_lesson(
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LessonResponse>> {
    let lesson = state
        .repos
        .lessons
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;

    Ok(Json(lesson.into()))
}

/// Update a lesson
pub async fn update_lesson(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateLessonRequest>,
) -> Result<Json<LessonResponse>> {
    if let Some(position) = req.position {
        if position < 0 {
            return Err(Error::Validation(
                "Lesson position must not be negative".to_string(),
            ));
        }
    }

    let updated = state
        .repos
        .lessons
        .update(id, req.level_id, req.title, req.content, req.position)
        .await?
        .ok_or_else(|| Error::NotFound("Lesson not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete a lesson
pub async fn delete_lesson(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let deleted = state.repos.lessons.delete(id).await?;
    if !deleted {
        return Err(Error::NotFound("Lesson not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
