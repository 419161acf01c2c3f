//! Production `TurnStore` backed by the repositories
//!
//! The profile-level and level-code lookups are cross-domain reads owned
//! here (lightweight read models over the accounts/catalog tables), so
//! the tutoring crate stays decoupled from those domain crates.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{Conversation, Message};
use crate::domain::service::{LevelRef, TurnStore};
use crate::repository::TutoringRepositories;
use lingua_common::Result;

/// Row type for the profile-level read model
#[derive(sqlx::FromRow)]
struct LevelRow {
    id: Uuid,
    code: String,
}

#[derive(Clone)]
pub struct PgTurnStore {
    repos: TutoringRepositories,
}

impl PgTurnStore {
    pub fn new(repos: TutoringRepositories) -> Self {
        Self { repos }
    }

    fn pool(&self) -> &PgPool {
        self.repos.pool()
    }
}

#[async_trait::async_trait]
impl TurnStore for PgTurnStore {
    async fn find_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Conversation>> {
        self.repos.conversations.find_owned(id, owner_id).await
    }

    async fn profile_level(&self, user_id: Uuid) -> Result<Option<LevelRef>> {
        let row: Option<LevelRow> = sqlx::query_as(
            r#"
            SELECT l.id, l.code::text AS code
            FROM user_profiles p
            INNER JOIN levels l ON l.id = p.level_id
            WHERE p.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|r| LevelRef {
            id: r.id,
            code: r.code,
        }))
    }

    async fn level_code(&self, level_id: Uuid) -> Result<Option<String>> {
        let code: Option<String> =
            sqlx::query_scalar("SELECT code::text FROM levels WHERE id = $1")
                .bind(level_id)
                .fetch_optional(self.pool())
                .await?;

        Ok(code)
    }

    async fn create_conversation(&self, conversation: &Conversation) -> Result<Conversation> {
        self.repos.conversations.create(conversation).await
    }

    async fn append_message(&self, message: &Message) -> Result<Message> {
        self.repos.messages.create(message).await
    }

    async fn recent_messages(&self, conversation_id: Uuid, limit: i64) -> Result<Vec<Message>> {
        self.repos.messages.recent(conversation_id, limit).await
    }

    async fn touch_conversation(&self, conversation_id: Uuid) -> Result<()> {
        self.repos.conversations.touch(conversation_id).await
    }
}
