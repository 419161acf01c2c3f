//! Level repository

use crate::domain::entities::{CefrCode, Level};
use lingua_common::{db, Result};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct LevelRepository {
    pool: PgPool,
}

impl LevelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find level by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Level>> {
        let level = sqlx::query_as::<_, Level>(
            r#"
            SELECT id, code, name, description
            FROM levels
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level)
    }

    /// Find level by CEFR code
    pub async fn find_by_code(&self, code: CefrCode) -> Result<Option<Level>> {
        let level = sqlx::query_as::<_, Level>(
            r#"
            SELECT id, code, name, description
            FROM levels
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level)
    }

    /// List levels, optionally filtered by code and searched over
    /// code/name/description, ordered by code
    pub async fn list(
        &self,
        code: Option<CefrCode>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Level>> {
        let pattern = search.map(|q| format!("%{}%", q));

        let levels = sqlx::query_as::<_, Level>(
            r#"
            SELECT id, code, name, description
            FROM levels
            WHERE ($1::cefr_level IS NULL OR code = $1)
              AND ($2::text IS NULL
                   OR code::text ILIKE $2
                   OR name ILIKE $2
                   OR description ILIKE $2)
            ORDER BY code
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(code)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(levels)
    }

    /// Create a new level; a duplicate code is a conflict
    pub async fn create(&self, level: &Level) -> Result<Level> {
        let created = sqlx::query_as::<_, Level>(
            r#"
            INSERT INTO levels (id, code, name, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, name, description
            "#,
        )
        .bind(level.id)
        .bind(level.code)
        .bind(&level.name)
        .bind(&level.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db::map_constraint_violation(e, "A level with this code already exists"))?;

        Ok(created)
    }

    /// Update level fields that were provided
    pub async fn update(
        &self,
        id: Uuid,
        code: Option<CefrCode>,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Option<Level>> {
        let updated = sqlx::query_as::<_, Level>(
            r#"
            UPDATE levels SET
                code = COALESCE($2, code),
                name = COALESCE($3, name),
                description = COALESCE($4, description)
            WHERE id = $1
            RETURNING id, code, name, description
            "#,
        )
        .bind(id)
        .bind(code)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db::map_constraint_violation(e, "A level with this code already exists"))?;

        Ok(updated)
    }

    /// Delete a level
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM levels WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
