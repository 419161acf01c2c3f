//! Level management API handlers
//!
//! Reads are open; writes require a bearer token.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use lingua_auth::AuthUser;
use lingua_common::{Error, Pagination, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::CatalogState;
use crate::domain::entities::{CefrCode, Level};

/// Request for creating a level
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLevelRequest {
    /// CEFR code (A1..C2)
    pub code: CefrCode,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// Request for updating a level
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateLevelRequest {
    pub code: Option<CefrCode>,

    #[validate(length(max = 100))]
    pub name: Option<String>,

    pub description: Option<String>,
}

/// Query params for listing levels
#[derive(Debug, Deserialize)]
pub struct ListLevelsQuery {
    pub code: Option<CefrCode>,
    /// Free-text search over code, name, and description
    pub q: Option<String>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Level response DTO
#[derive(Debug, Serialize)]
pub struct LevelResponse {
    pub id: Uuid,
    pub code: CefrCode,
    pub name: String,
    pub description: String,
}

impl From<Level> for LevelResponse {
    fn from(l: Level) -> Self {
        Self {
            id: l.id,
            code: l.code,
            name: l.name,
            description: l.description,
        }
    }
}

/// Create a new level
pub async fn create_level(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    ValidatedJson(req): ValidatedJson<CreateLevelRequest>,
) -> Result<(StatusCode, Json<LevelResponse>)> {
    let level = Level::new(req.code, req.name, req.description)?;
    let created = state.repos.levels.create(&level).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List levels (open)
pub async fn list_levels(
    State(state): State<CatalogState>,
    Query(query): Query<ListLevelsQuery>,
) -> Result<Json<Vec<LevelResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let levels = state
        .repos
        .levels
        .list(query.code, query.q.as_deref(), page.limit(), page.offset())
        .await?;

    let responses: Vec<LevelResponse> = levels.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get a single level by ID (open)
pub async fn get_level(
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LevelResponse>> {
    let level = state
        .repos
        .levels
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Level not found".to_string()))?;

    Ok(Json(level.into()))
}

/// Update a level
pub async fn update_level(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateLevelRequest>,
) -> Result<Json<LevelResponse>> {
    let updated = state
        .repos
        .levels
        .update(id, req.code, req.name, req.description)
        .await?
        .ok_or_else(|| Error::NotFound("Level not found".to_string()))?;

    Ok(Json(updated.into()))
}

/// Delete a level
pub async fn delete_level(
    AuthUser(_ctx): AuthUser,
    State(state): State<CatalogState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    let deleted = state.repos.levels.delete(id).await?;
    if !deleted {
        return Err(Error::NotFound("Level not found".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_response_serialization() {
        let level = Level::new(
            CefrCode::A2,
            "Elementary".to_string(),
            "Waystage level".to_string(),
        )
        .unwrap();

        let response = LevelResponse::from(level);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("\"A2\""));
        assert!(json.contains("Elementary"));
    }

    #[test]
    fn test_create_level_request_defaults() {
        let req: CreateLevelRequest = serde_json::from_str(r#"{"code": "B2"}"#).unwrap();
        assert_eq!(req.code, CefrCode::B2);
        assert!(req.name.is_empty());
        assert!(req.description.is_empty());
    }

    #[test]
    fn test_create_level_request_rejects_unknown_code() {
        let result: std::result::Result<CreateLevelRequest, _> =
            serde_json::from_str(r#"{"code": "Z9"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_level_request_name_validation() {
        let req = UpdateLevelRequest {
            code: None,
            name: Some("a".repeat(101)),
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
