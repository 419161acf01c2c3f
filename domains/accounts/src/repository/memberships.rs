//! Level membership repository

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::LevelMembership;
use lingua_common::{db, Result};

#[derive(Clone)]
pub struct MembershipRepository {
    pool: PgPool,
}

impl MembershipRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find membership by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<LevelMembership>> {
        let membership = sqlx::query_as::<_, LevelMembership>(
            r#"
            SELECT id, user_id, level_id, start_date, end_date
            FROM level_memberships
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    /// List memberships, optionally filtered by user, most recent first
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<LevelMembership>> {
        let memberships = sqlx::query_as::<_, LevelMembership>(
            r#"
            SELECT id, user_id, level_id, start_date, end_date
            FROM level_memberships
            WHERE ($1::uuid IS NULL OR user_id = $1)
            ORDER BY start_date DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    /// Create a new membership record
    pub async fn create(&self, membership: &LevelMembership) -> Result<LevelMembership> {
        let created = sqlx::query_as::<_, LevelMembership>(
            r#"
            INSERT INTO level_memberships (id, user_id, level_id, start_date, end_date)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, level_id, start_date, end_date
            "#,
        )
        .bind(membership.id)
        .bind(membership.user_id)
        .bind(membership.level_id)
        .bind(membership.start_date)
        .bind(membership.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db::map_constraint_violation(e, "Membership already exists"))?;

        Ok(created)
    }

    /// Close or move a membership's date range
    pub async fn update(
        &self,
        id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<Option<NaiveDate>>,
    ) -> Result<Option<LevelMembership>> {
        let updated = sqlx::query_as::<_, LevelMembership>(
            r#"
            UPDATE level_memberships SET
                start_date = COALESCE($2, start_date),
                end_date = CASE WHEN $3 THEN $4 ELSE end_date END
            WHERE id = $1
            RETURNING id, user_id, level_id, start_date, end_date
            "#,
        )
        .bind(id)
        .bind(start_date)
        .bind(end_date.is_some())
        .bind(end_date.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a membership record
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM level_memberships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
