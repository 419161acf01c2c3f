//! Message API handlers
//!
//! Messages are append-only and live under their conversation; both
//! reads and appends are owner-scoped.

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

use crate::api::middleware::TutoringState;
use crate::domain::entities::{Message, MessageSender};

/// Request for appending a message
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMessageRequest {
    #[serde(default = "default_sender")]
    pub sender: MessageSender,

    #[validate(length(min = 1))]
    pub text: String,
}

fn default_sender() -> MessageSender {
    MessageSender::User
}

/// Request for appending a message via the flat collection
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFlatMessageRequest {
    pub conversation_id: Uuid,

    #[serde(default = "default_sender")]
    pub sender: MessageSender,

    #[validate(length(min = 1))]
    pub text: String,
}

/// Query params for the flat message listing
#[derive(Debug, Deserialize)]
pub struct ListMessagesQuery {
    pub conversation_id: Option<Uuid>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

/// Message response DTO
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: MessageSender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageResponse {
    fn from(m: Message) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender: m.sender,
            text: m.text,
            created_at: m.created_at,
        }
    }
}

/// List messages for a conversation
pub async fn list_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Vec<MessageResponse>>> {
    state
        .repos
        .conversations
        .find_owned(conversation_id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    let messages = state
        .repos
        .messages
        .list_by_conversation(conversation_id)
        .await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Append a message to a conversation without going through the tutor
pub async fn create_message(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Path(conversation_id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<CreateMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state
        .repos
        .conversations
        .find_owned(conversation_id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    let message = Message::new(conversation_id, req.sender, req.text)?;
    let created = state.repos.messages.create(&message).await?;
    state.repos.conversations.touch(conversation_id).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List messages across the caller's conversations
pub async fn list_all_messages(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>> {
    let page = Pagination {
        offset: query.offset,
        limit: query.limit,
    };
    let messages = state
        .repos
        .messages
        .list_for_owner(
            ctx.user.id,
            query.conversation_id,
            page.limit(),
            page.offset(),
        )
        .await?;

    let responses: Vec<MessageResponse> = messages.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Append a message through the flat collection
pub async fn create_flat_message(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    ValidatedJson(req): ValidatedJson<CreateFlatMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    state
        .repos
        .conversations
        .find_owned(req.conversation_id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;

    let message = Message::new(req.conversation_id, req.sender, req.text)?;
    let created = state.repos.messages.create(&message).await?;
    state.repos.conversations.touch(req.conversation_id).await?;

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a single message by id (owner only; foreign messages look absent)
pub async fn get_message(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    let message = state
        .repos
        .messages
        .find_for_owner(id, ctx.user.id)
        .await?
        .ok_or_else(|| Error::NotFound("Message not found".to_string()))?;

    Ok(Json(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_message_request_defaults_to_user_sender() {
        let req: CreateMessageRequest = serde_json::from_str(r#"{"text": "Hi"}"#).unwrap();
        assert_eq!(req.sender, MessageSender::User);
    }

    #[test]
    fn test_create_message_request_accepts_system_sender() {
        let req: CreateMessageRequest =
            serde_json::from_str(r#"{"sender": "system", "text": "Context"}"#).unwrap();
        assert_eq!(req.sender, MessageSender::System);
    }

    #[test]
    fn test_message_response_serialization() {
        let message = Message::new(
            Uuid::new_v4(),
            MessageSender::Assistant,
            "A reply".to_string(),
        )
        .unwrap();

        let json = serde_json::to_string(&MessageResponse::from(message)).unwrap();
        assert!(json.contains("\"assistant\""));
        assert!(json.contains("A reply"));
    }
}
