//! Message repository

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Message;
use lingua_common::Result;

#[derive(Clone)]
pub struct MessageRepository {
    pool: PgPool,
}

impl MessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List messages for a conversation, ordered by creation time ASC
    pub async fn list_by_conversation(&self, conversation_id: Uuid) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender, text, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// The most recent `limit` messages of a conversation, oldest first
    pub async fn recent(&self, conversation_id: Uuid, limit: i64) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT id, conversation_id, sender, text, created_at
            FROM (
                SELECT id, conversation_id, sender, text, created_at
                FROM messages
                WHERE conversation_id = $1
                ORDER BY created_at DESC
                LIMIT $2
            ) recent
            ORDER BY created_at ASC
            "#,
        )
        .bind(conversation_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Find a message by id, scoped to the conversation owner
    pub async fn find_for_owner(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Message>> {
        let message = sqlx::query_as::<_, Message>(
            r#"
            SELECT m.id, m.conversation_id, m.sender, m.text, m.created_at
            FROM messages m
            INNER JOIN conversations c ON c.id = m.conversation_id
            WHERE m.id = $1 AND c.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(message)
    }

    /// List messages across the owner's conversations, optionally
    /// filtered to one conversation, ordered by creation time ASC
    pub async fn list_for_owner(
        &self,
        owner_id: Uuid,
        conversation_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Message>> {
        let messages = sqlx::query_as::<_, Message>(
            r#"
            SELECT m.id, m.conversation_id, m.sender, m.text, m.created_at
            FROM messages m
            INNER JOIN conversations c ON c.id = m.conversation_id
            WHERE c.user_id = $1
              AND ($2::uuid IS NULL OR m.conversation_id = $2)
            ORDER BY m.created_at ASC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(owner_id)
        .bind(conversation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Append a message
    pub async fn create(&self, message: &Message) -> Result<Message> {
        let created = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (id, conversation_id, sender, text, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, conversation_id, sender, text, created_at
            "#,
        )
        .bind(message.id)
        .bind(message.conversation_id)
        .bind(message.sender)
        .bind(&message.text)
        .bind(message.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }
}
