//! Conversation management API handlers
//!
//! Conversations are scoped to their owner throughout; a conversation
//! that exists but belongs to someone else is indistinguishable from one
//! that does not exist.

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

use crate::api::handlers::messages::MessageResponse;
use crate::api::middleware::TutoringState;
use crate::domain::entities::Conversation;

/// Request for creating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct CreateConversationRequest {
    /// Level snapshot; defaults to none
    pub level_id: Option<Uuid>,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub title: String,
}

/// Request for updating a conversation
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateConversationRequest {
    #[validate(length(max = 255))]
    pub title: String,
}

/// Query params for listing conversations
#[derive(Debug, Deserialize)]
pub struct ListConversationsQuery {
    pub level_id: Option<Uuid>,
    pub created_after: Option<DateTime<Utc>>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Conversation response DTO, embedding the conversation's messages
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub messages: Vec<MessageResponse>,
}

impl ConversationResponse {
    fn new(conversation: Conversation, messages: Vec<MessageResponse>) -> Self {
        Self {
            id: conversation.id,
            user_id: conversation.user_id,
            level_id: conversation.level_id,
            title: conversation.title,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
            messages,
        }
    }
}

impl TutoringState {
    /// Attach a conversation's messages to build its response body
    async fn embed_messages(&self, conversation: Conversation) -> Result<ConversationResponse> {
        let messages = self
            .repos
            .messages
            .list_by_conversation(conversation.id)
            .await?;

        Ok(ConversationResponse::new(
            conversation,
            messages.into_iter().map(Into::into).collect(),
        ))
    }
}

/// Create a new conversation
pub async fn create_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    ValidatedJson(req): ValidatedJson<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>)> {
    let conversation = Conversation::new(ctx.user.id, req.level_id, req.title)?;
    let created = state.repos.conversations.create(&conversation).await?;

    Ok((
        StatusCode::CREATED,
        Json(ConversationResponse::new(created, Vec::new())),
    ))
}

/// List the caller's conversations, newest-updated first
pub async fn list_conversations(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Query(query): Query<ListConversationsQuery>,
) -> Result<Json<Vec<ConversationResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let conversations = state
        .repos
        .conversations
        .list_by_user(
            ctx.user.id,
            query.level_id,
            query.created_after,
            page.limit(),
            page.offset(),
        )
        .await?;

    let mut responses = Vec::with_capacity(conversations.len());
    for conversation in conversations {
        responses.push(state.embed_messages(conversation).await?);
    }

    Ok(Json(responses))
}

/// Get a single conversation with its messages
pub async fn get_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConversationResponse>> {
    let conversation = state
        .repos
        .conversations
        .find_owned(id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    Ok(Json(state.embed_messages(conversation).await?))
}

/// Update a conversation's title
pub async fn update_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateConversationRequest>,
) -> Result<Json<ConversationResponse>> {
    state
        .repos
        .conversations
        .find_owned(id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    let updated = state
        .repos
        .conversations
        .update_title(id, &req.title)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    Ok(Json(state.embed_messages(updated).await?))
}

/// Delete a conversation
pub async fn delete_conversation(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    state
        .repos
        .conversations
        .find_owned(id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    state.repos.conversations.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
