//! Progress repository

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::Progress;
use lingua_common::{db, Result};

#[derive(Clone)]
pub struct ProgressRepository {
    pool: PgPool,
}

impl ProgressRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find progress record by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Progress>> {
        let progress = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, user_id, lesson_id, completed, score, completed_at
            FROM progress
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(progress)
    }

    /// List progress records, optionally filtered by user, lesson, and
    /// completion flag
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        lesson_id: Option<Uuid>,
        completed: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Progress>> {
        let records = sqlx::query_as::<_, Progress>(
            r#"
            SELECT id, user_id, lesson_id, completed, score, completed_at
            FROM progress
            WHERE ($1::uuid IS NULL OR user_id = $1)
              AND ($2::uuid IS NULL OR lesson_id = $2)
              AND ($3::boolean IS NULL OR completed = $3)
            ORDER BY user_id, lesson_id
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(user_id)
        .bind(lesson_id)
        .bind(completed)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Create a new progress record; a duplicate (user, lesson) pair is a
    /// conflict
    pub async fn create(&self, progress: &Progress) -> Result<Progress> {
        let created = sqlx::query_as::<_, Progress>(
            r#"
            INSERT INTO progress (id, user_id, lesson_id, completed, score, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, lesson_id, completed, score, completed_at
            "#,
        )
        .bind(progress.id)
        .bind(progress.user_id)
        .bind(progress.lesson_id)
        .bind(progress.completed)
        .bind(progress.score)
        .bind(progress.completed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            db::map_constraint_violation(e, "Progress for this user and lesson already exists")
        })?;

        Ok(created)
    }

    /// Update completion state. Score and completion timestamp use
    /// set-or-keep flags so they can be cleared explicitly.
    pub async fn update(
        &self,
        id: Uuid,
        completed: Option<bool>,
        score: Option<Option<Decimal>>,
        completed_at: Option<Option<DateTime<Utc>>>,
    ) -> Result<Option<Progress>> {
        let updated = sqlx::query_as::<_, Progress>(
            r#"
            UPDATE progress SET
                completed = COALESCE($2, completed),
                score = CASE WHEN $3 THEN $4 ELSE score END,
                completed_at = CASE WHEN $5 THEN $6 ELSE completed_at END
            WHERE id = $1
            RETURNING id, user_id, lesson_id, completed, score, completed_at
            "#,
        )
        .bind(id)
        .bind(completed)
        .bind(score.is_some())
        .bind(score.flatten())
        .bind(completed_at.is_some())
        .bind(completed_at.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a progress record
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM progress WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
