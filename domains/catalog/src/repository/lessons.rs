//! Lesson repository

use crate::domain::entities::Lesson;
use lingua_common::{db, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LessonRepository {
    pool: PgPool,
}

impl LessonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find lesson by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Lesson>> {
        let lesson = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, level_id, title, content, position, created_at
            FROM lessons
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(lesson)
    }

    /// List lessons, optionally filtered by level and searched over
    /// title/content, ordered by level then position
    pub async fn list(
        &self,
        level_id: Option<Uuid>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Lesson>> {
        let pattern = search.map(|q| format!("%{}%", q));

        let lessons = sqlx::query_as::<_, Lesson>(
            r#"
            SELECT id, level_id, title, content, position, created_at
            FROM lessons
            WHERE ($1::uuid IS NULL OR level_id = $1)
              AND ($2::text IS NULL OR title ILIKE $2 OR content ILIKE $2)
            ORDER BY level_id, position, created_at
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(level_id)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(lessons)
    }

    /// Create a new lesson
    pub async fn create(&self, lesson: &Lesson) -> Result<Lesson> {
        let created = sqlx::query_as::<_, Lesson>(
            r#"
            INSERT INTO lessons (id, level_id, title, content, position, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, level_id, title, content, position, created_at
            "#,
        )
        .bind(lesson.id)
        .bind(lesson.level_id)
        .bind(&lesson.title)
        .bind(&lesson.content)
        .bind(lesson.position)
        .bind(lesson.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db::map_constraint_violation(e, "Lesson already exists"))?;

        Ok(created)
    }

    /// Update lesson fields that were provided
    pub async fn update(
        &self,
        id: Uuid,
        level_id: Option<Uuid>,
        title: Option<String>,
        content: Option<String>,
        position: Option<i32>,
    ) -> Result<Option<Lesson>> {
        let updated = sqlx::query_as::<_, Lesson>(
            r#"
            UPDATE lessons SET
                level_id = COALESCE($2, level_id),
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                position = COALESCE($5, position)
            WHERE id = $1
            RETURNING id, level_id, title, content, position, created_at
            "#,
        )
        .bind(id)
        .bind(level_id)
        .bind(title)
        .bind(content)
        .bind(position)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db::map_constraint_violation(e, "Lesson already exists"))?;

        Ok(updated)
    }

    /// Delete a lesson
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM lessons WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
