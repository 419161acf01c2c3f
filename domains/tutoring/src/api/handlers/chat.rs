//! Chat turn handler
//!
//! The one non-CRUD endpoint: relays a conversation turn through the
//! tutoring session manager.

use axum::{extract::State, Json};
use lingua_auth::AuthUser;
use lingua_common::{Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::TutoringState;

/// Request for a chat turn
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    /// The user's message text
    pub message: String,

    /// Existing conversation to continue; a new one is created when absent
    pub conversation_id: Option<Uuid>,
}

/// Response for a chat turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub conversation_id: Uuid,
    pub response: String,
}

/// Submit a chat turn
pub async fn chat(
    AuthUser(ctx): AuthUser,
    State(state): State<TutoringState>,
    ValidatedJson(req): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let outcome = state
        .tutor
        .submit_turn(&ctx.user, req.conversation_id, &req.message)
        .await?;

    Ok(Json(ChatResponse {
        conversation_id: outcome.conversation_id,
        response: outcome.response,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_deserializes_without_conversation_id() {
        let req: ChatRequest = serde_json::from_str(r#"{"message": "Hola"}"#).unwrap();
        assert_eq!(req.message, "Hola");
        assert!(req.conversation_id.is_none());
    }

    #[test]
    fn test_chat_response_serialization() {
        let response = ChatResponse {
            conversation_id: Uuid::new_v4(),
            response: "Claro, veamos un ejemplo.".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("conversation_id"));
        assert!(json.contains("Claro, veamos un ejemplo."));
    }
}
