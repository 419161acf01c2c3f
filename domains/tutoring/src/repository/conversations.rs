//! Conversation repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Conversation;
use lingua_common::Result;

#[derive(Clone)]
pub struct ConversationRepository {
    pool: PgPool,
}

impl ConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a conversation by id, scoped to its owner.
    ///
    /// Absent and not-owned deliberately look the same to the caller.
    pub async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Conversation>> {
        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, user_id, level_id, title, created_at, updated_at
            FROM conversations
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(conversation)
    }

    /// List a user's conversations, newest-updated first, optionally
    /// filtered by level snapshot and creation time
    pub async fn list_by_user(
        &self,
        user_id: Uuid,
        level_id: Option<Uuid>,
        created_after: Option<DateTime<Utc>>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT id, user_id, level_id, title, created_at, updated_at
            FROM conversations
            WHERE user_id = $1
              AND ($2::uuid IS NULL OR level_id = $2)
              AND ($3::timestamptz IS NULL OR created_at >= $3)
            ORDER BY updated_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(level_id)
        .bind(created_after)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(conversations)
    }

    /// Create a new conversation
    pub async fn create(&self, conversation: &Conversation) -> Result<Conversation> {
        let created = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (id, user_id, level_id, title, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, level_id, title, created_at, updated_at
            "#,
        )
        .bind(conversation.id)
        .bind(conversation.user_id)
        .bind(conversation.level_id)
        .bind(&conversation.title)
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    /// Update a conversation's title
    pub async fn update_title(&self, id: Uuid, title: &str) -> Result<Option<Conversation>> {
        let updated = sqlx::query_as::<_, Conversation>(
            r#"
            UPDATE conversations SET
                title = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, level_id, title, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Refresh `updated_at` after a message append
    pub async fn touch(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE conversations SET updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete a conversation (and, via the schema, its messages)
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM conversations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
