//! Domain entities for the Tutoring domain
//!
//! A conversation is an append-only sequence of messages between one user
//! and the tutor. History is immutable once written; only the
//! conversation's `updated_at` moves as messages are appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lingua_common::{Error, Result};

/// Message sender role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "message_sender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageSender {
    User,
    Assistant,
    System,
}

impl std::fmt::Display for MessageSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageSender::User => write!(f, "user"),
            MessageSender::Assistant => write!(f, "assistant"),
            MessageSender::System => write!(f, "system"),
        }
    }
}

/// Maximum conversation title length (varchar(255))
const MAX_TITLE_LENGTH: usize = 255;

/// Conversation entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Snapshot of the learner's level when the conversation was created
    pub level_id: Option<Uuid>,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create a new conversation
    pub fn new(user_id: Uuid, level_id: Option<Uuid>, title: String) -> Result<Self> {
        if title.len() > MAX_TITLE_LENGTH {
            return Err(Error::Validation(format!(
                "Title must be at most {} characters",
                MAX_TITLE_LENGTH
            )));
        }

        let now = Utc::now();
        Ok(Conversation {
            id: Uuid::new_v4(),
            user_id,
            level_id,
            title,
            created_at: now,
            updated_at: now,
        })
    }

    /// Default title for a conversation started from a chat turn
    pub fn generated_title(username: &str, date: chrono::NaiveDate) -> String {
        format!("Chat {} {}", username, date)
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender: MessageSender,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    /// Create a new message
    pub fn new(conversation_id: Uuid, sender: MessageSender, text: String) -> Result<Self> {
        if text.trim().is_empty() {
            return Err(Error::Validation(
                "Message text cannot be empty or whitespace-only".to_string(),
            ));
        }

        Ok(Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender,
            text,
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Enum tests

    #[test]
    fn test_message_sender_display() {
        assert_eq!(MessageSender::User.to_string(), "user");
        assert_eq!(MessageSender::Assistant.to_string(), "assistant");
        assert_eq!(MessageSender::System.to_string(), "system");
    }

    #[test]
    fn test_message_sender_serialization_lowercase() {
        assert_eq!(
            serde_json::to_string(&MessageSender::User).unwrap(),
            "\"user\""
        );
        assert_eq!(
            serde_json::to_string(&MessageSender::Assistant).unwrap(),
            "\"assistant\""
        );
        assert_eq!(
            serde_json::to_string(&MessageSender::System).unwrap(),
            "\"system\""
        );
    }

    // Conversation entity

    #[test]
    fn test_conversation_creation() {
        let user_id = Uuid::new_v4();
        let level_id = Uuid::new_v4();
        let conv =
            Conversation::new(user_id, Some(level_id), "My chat".to_string()).unwrap();

        assert_eq!(conv.user_id, user_id);
        assert_eq!(conv.level_id, Some(level_id));
        assert_eq!(conv.title, "My chat");
        assert_eq!(conv.created_at, conv.updated_at);
    }

    #[test]
    fn test_conversation_without_level() {
        let conv = Conversation::new(Uuid::new_v4(), None, String::new()).unwrap();
        assert!(conv.level_id.is_none());
    }

    #[test]
    fn test_conversation_title_255_chars_valid() {
        let result = Conversation::new(Uuid::new_v4(), None, "a".repeat(255));
        assert!(result.is_ok());
    }

    #[test]
    fn test_conversation_title_256_chars_rejected() {
        let result = Conversation::new(Uuid::new_v4(), None, "a".repeat(256));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at most 255"));
    }

    #[test]
    fn test_generated_title_contains_username_and_date() {
        let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        let title = Conversation::generated_title("maria", date);
        assert_eq!(title, "Chat maria 2024-05-17");
    }

    // Message entity

    #[test]
    fn test_message_creation() {
        let conv_id = Uuid::new_v4();
        let msg = Message::new(conv_id, MessageSender::User, "Hello".to_string()).unwrap();

        assert_eq!(msg.conversation_id, conv_id);
        assert_eq!(msg.sender, MessageSender::User);
        assert_eq!(msg.text, "Hello");
    }

    #[test]
    fn test_message_empty_text_rejected() {
        let result = Message::new(Uuid::new_v4(), MessageSender::User, String::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_message_whitespace_only_text_rejected() {
        let result = Message::new(Uuid::new_v4(), MessageSender::User, "  \t\n ".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_message_keeps_surrounding_whitespace() {
        let msg =
            Message::new(Uuid::new_v4(), MessageSender::User, "  hi  ".to_string()).unwrap();
        assert_eq!(msg.text, "  hi  ");
    }

    #[test]
    fn test_message_serialization_roundtrip() {
        let msg = Message::new(
            Uuid::new_v4(),
            MessageSender::Assistant,
            "A reply".to_string(),
        )
        .unwrap();

        let json = serde_json::to_string(&msg).unwrap();
        let deserialized: Message = serde_json::from_str(&json).unwrap();

        assert_eq!(msg.id, deserialized.id);
        assert_eq!(msg.sender, deserialized.sender);
        assert_eq!(msg.text, deserialized.text);
    }
}
