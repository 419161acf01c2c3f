//! Domain entities for the Accounts domain

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lingua_common::{Error, Result};

/// Maximum username length (varchar(150))
const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum email length (varchar(254))
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum first/last name length (varchar(150))
const MAX_NAME_LENGTH: usize = 150;

/// User account entity.
///
/// The password hash never leaves the process: it is skipped on
/// serialization and the API layer maps to DTOs anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user account with an already-hashed password
    pub fn new(
        username: String,
        email: String,
        first_name: String,
        last_name: String,
        password_hash: String,
    ) -> Result<Self> {
        if username.trim().is_empty() {
            return Err(Error::Validation("Username is required".to_string()));
        }
        if username.len() > MAX_USERNAME_LENGTH {
            return Err(Error::Validation(format!(
                "Username must be at most {} characters",
                MAX_USERNAME_LENGTH
            )));
        }
        if email.len() > MAX_EMAIL_LENGTH {
            return Err(Error::Validation(format!(
                "Email must be at most {} characters",
                MAX_EMAIL_LENGTH
            )));
        }
        if first_name.len() > MAX_NAME_LENGTH || last_name.len() > MAX_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "Names must be at most {} characters",
                MAX_NAME_LENGTH
            )));
        }

        let now = Utc::now();
        Ok(User {
            id: Uuid::new_v4(),
            username,
            email,
            first_name,
            last_name,
            password_hash,
            created_at: now,
            updated_at: now,
        })
    }
}

/// User profile entity — one per account, carries the learner's current
/// level and tutor flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level_id: Option<Uuid>,
    pub membership_date: NaiveDate,
    pub bio: String,
    pub is_tutor: bool,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Create a new profile
    pub fn new(
        user_id: Uuid,
        level_id: Option<Uuid>,
        membership_date: Option<NaiveDate>,
        bio: String,
        is_tutor: bool,
        avatar_url: Option<String>,
    ) -> Self {
        let now = Utc::now();
        UserProfile {
            id: Uuid::new_v4(),
            user_id,
            level_id,
            membership_date: membership_date.unwrap_or_else(|| now.date_naive()),
            bio,
            is_tutor,
            avatar_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Level membership entity — append-only history of a user's association
/// with a level over a date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LevelMembership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub level_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

impl LevelMembership {
    /// Create a new membership record
    pub fn new(
        user_id: Uuid,
        level_id: Uuid,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Self> {
        let start_date = start_date.unwrap_or_else(|| Utc::now().date_naive());

        if let Some(end) = end_date {
            if end < start_date {
                return Err(Error::Validation(
                    "Membership end date must not precede its start date".to_string(),
                ));
            }
        }

        Ok(LevelMembership {
            id: Uuid::new_v4(),
            user_id,
            level_id,
            start_date,
            end_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str) -> Result<User> {
        User::new(
            username.to_string(),
            "ana@example.com".to_string(),
            "Ana".to_string(),
            "García".to_string(),
            "salt:hash".to_string(),
        )
    }

    // User entity

    #[test]
    fn test_user_creation() {
        let user = new_user("ana").unwrap();
        assert_eq!(user.username, "ana");
        assert_eq!(user.email, "ana@example.com");
    }

    #[test]
    fn test_user_empty_username_rejected() {
        let result = new_user("   ");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Username"));
    }

    #[test]
    fn test_user_username_151_chars_rejected() {
        let result = new_user(&"a".repeat(151));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at most 150"));
    }

    #[test]
    fn test_user_password_hash_not_serialized() {
        let user = new_user("ana").unwrap();
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("salt:hash"));
    }

    // UserProfile entity

    #[test]
    fn test_profile_defaults_membership_date_to_today() {
        let profile = UserProfile::new(Uuid::new_v4(), None, None, String::new(), false, None);
        assert_eq!(profile.membership_date, Utc::now().date_naive());
        assert!(!profile.is_tutor);
        assert!(profile.level_id.is_none());
    }

    #[test]
    fn test_profile_explicit_membership_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let profile = UserProfile::new(
            Uuid::new_v4(),
            Some(Uuid::new_v4()),
            Some(date),
            "Learning Spanish".to_string(),
            true,
            Some("https://example.com/a.png".to_string()),
        );
        assert_eq!(profile.membership_date, date);
        assert!(profile.is_tutor);
    }

    // LevelMembership entity

    #[test]
    fn test_membership_creation_defaults() {
        let membership =
            LevelMembership::new(Uuid::new_v4(), Uuid::new_v4(), None, None).unwrap();
        assert_eq!(membership.start_date, Utc::now().date_naive());
        assert!(membership.end_date.is_none());
    }

    #[test]
    fn test_membership_end_before_start_rejected() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let result =
            LevelMembership::new(Uuid::new_v4(), Uuid::new_v4(), Some(start), Some(end));
        assert!(result.is_err());
    }

    #[test]
    fn test_membership_end_equal_to_start_valid() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let result =
            LevelMembership::new(Uuid::new_v4(), Uuid::new_v4(), Some(date), Some(date));
        assert!(result.is_ok());
    }
}
