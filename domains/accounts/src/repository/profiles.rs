//! User profile repository

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::UserProfile;
use lingua_common::{db, Result};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find profile by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, level_id, membership_date, bio, is_tutor,
                   avatar_url, created_at, updated_at
            FROM user_profiles
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Find the profile belonging to a user
    pub async fn find_by_user(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, user_id, level_id, membership_date, bio, is_tutor,
                   avatar_url, created_at, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// List profiles, optionally filtered by the level's CEFR code and
    /// searched over the owner's user/first/last names
    pub async fn list(
        &self,
        level_code: Option<&str>,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserProfile>> {
        let pattern = search.map(|q| format!("%{}%", q));

        let profiles = sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT p.id, p.user_id, p.level_id, p.membership_date, p.bio,
                   p.is_tutor, p.avatar_url, p.created_at, p.updated_at
            FROM user_profiles p
            INNER JOIN users u ON u.id = p.user_id
            LEFT JOIN levels l ON l.id = p.level_id
            WHERE ($1::text IS NULL OR l.code::text = $1)
              AND ($2::text IS NULL
                   OR u.username ILIKE $2
                   OR u.first_name ILIKE $2
                   OR u.last_name ILIKE $2)
            ORDER BY u.username
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(level_code)
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Create a new profile; a second profile for the same user is a
    /// conflict
    pub async fn create(&self, profile: &UserProfile) -> Result<UserProfile> {
        let created = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO user_profiles (
                id, user_id, level_id, membership_date, bio, is_tutor,
                avatar_url, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, level_id, membership_date, bio, is_tutor,
                      avatar_url, created_at, updated_at
            "#,
        )
        .bind(profile.id)
        .bind(profile.user_id)
        .bind(profile.level_id)
        .bind(profile.membership_date)
        .bind(&profile.bio)
        .bind(profile.is_tutor)
        .bind(&profile.avatar_url)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db::map_constraint_violation(e, "User already has a profile"))?;

        Ok(created)
    }

    /// Update profile fields. `level_id` and `avatar_url` use set-or-keep
    /// flags so the level can be cleared as the learner's state changes.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        level_id: Option<Option<Uuid>>,
        membership_date: Option<NaiveDate>,
        bio: Option<String>,
        is_tutor: Option<bool>,
        avatar_url: Option<Option<String>>,
    ) -> Result<Option<UserProfile>> {
        let updated = sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE user_profiles SET
                level_id = CASE WHEN $2 THEN $3 ELSE level_id END,
                membership_date = COALESCE($4, membership_date),
                bio = COALESCE($5, bio),
                is_tutor = COALESCE($6, is_tutor),
                avatar_url = CASE WHEN $7 THEN $8 ELSE avatar_url END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, user_id, level_id, membership_date, bio, is_tutor,
                      avatar_url, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(level_id.is_some())
        .bind(level_id.flatten())
        .bind(membership_date)
        .bind(bio)
        .bind(is_tutor)
        .bind(avatar_url.is_some())
        .bind(avatar_url.flatten())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Delete a profile
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_profiles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
