//! Domain entities for the Catalog domain
//!
//! CEFR levels are immutable reference data; lessons hang off a level with
//! an ordering rank; progress records one user's state for one lesson.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use lingua_common::{Error, Result};

/// CEFR proficiency code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "cefr_level")]
pub enum CefrCode {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl std::fmt::Display for CefrCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            CefrCode::A1 => "A1",
            CefrCode::A2 => "A2",
            CefrCode::B1 => "B1",
            CefrCode::B2 => "B2",
            CefrCode::C1 => "C1",
            CefrCode::C2 => "C2",
        };
        write!(f, "{}", code)
    }
}

impl std::str::FromStr for CefrCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "A1" => Ok(CefrCode::A1),
            "A2" => Ok(CefrCode::A2),
            "B1" => Ok(CefrCode::B1),
            "B2" => Ok(CefrCode::B2),
            "C1" => Ok(CefrCode::C1),
            "C2" => Ok(CefrCode::C2),
            other => Err(Error::Validation(format!(
                "Unknown CEFR code: {} (expected one of A1, A2, B1, B2, C1, C2)",
                other
            ))),
        }
    }
}

/// Maximum level name length (varchar(100))
const MAX_LEVEL_NAME_LENGTH: usize = 100;

/// Maximum lesson title length (varchar(200))
const MAX_LESSON_TITLE_LENGTH: usize = 200;

/// Maximum score representable in NUMERIC(5,2)
const MAX_SCORE: &str = "999.99";

/// Level entity — immutable reference data keyed by its unique CEFR code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Level {
    pub id: Uuid,
    pub code: CefrCode,
    pub name: String,
    pub description: String,
}

impl Level {
    /// Create a new level
    pub fn new(code: CefrCode, name: String, description: String) -> Result<Self> {
        if name.len() > MAX_LEVEL_NAME_LENGTH {
            return Err(Error::Validation(format!(
                "Level name must be at most {} characters",
                MAX_LEVEL_NAME_LENGTH
            )));
        }

        Ok(Level {
            id: Uuid::new_v4(),
            code,
            name,
            description,
        })
    }
}

/// Lesson entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Lesson {
    pub id: Uuid,
    pub level_id: Uuid,
    pub title: String,
    pub content: String,
    /// Ordering rank within the level
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

impl Lesson {
    /// Create a new lesson
    pub fn new(level_id: Uuid, title: String, content: String, position: i32) -> Result<Self> {
        if title.trim().is_empty() {
            return Err(Error::Validation("Lesson title is required".to_string()));
        }
        if title.len() > MAX_LESSON_TITLE_LENGTH {
            return Err(Error::Validation(format!(
                "Lesson title must be at most {} characters",
                MAX_LESSON_TITLE_LENGTH
            )));
        }
        if position < 0 {
            return Err(Error::Validation(
                "Lesson position must not be negative".to_string(),
            ));
        }

        Ok(Lesson {
            id: Uuid::new_v4(),
            level_id,
            title,
            content,
            position,
            created_at: Utc::now(),
        })
    }
}

/// Progress entity — unique per (user, lesson)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub lesson_id: Uuid,
    pub completed: bool,
    pub score: Option<Decimal>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Progress {
    /// Create a new progress record
    pub fn new(
        user_id: Uuid,
        lesson_id: Uuid,
        completed: bool,
        score: Option<Decimal>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<Self> {
        Self::validate_score(score)?;

        Ok(Progress {
            id: Uuid::new_v4(),
            user_id,
            lesson_id,
            completed,
            score,
            completed_at,
        })
    }

    /// Validate score fits NUMERIC(5,2) and is not negative
    pub fn validate_score(score: Option<Decimal>) -> Result<()> {
        if let Some(s) = score {
            let max: Decimal = MAX_SCORE.parse().unwrap_or_default();
            if s < Decimal::ZERO || s > max {
                return Err(Error::Validation(format!(
                    "Score must be between 0 and {}",
                    MAX_SCORE
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // CEFR code

    #[test]
    fn test_cefr_code_display() {
        assert_eq!(CefrCode::A1.to_string(), "A1");
        assert_eq!(CefrCode::C2.to_string(), "C2");
    }

    #[test]
    fn test_cefr_code_parse_all_valid() {
        for code in ["A1", "A2", "B1", "B2", "C1", "C2"] {
            let parsed: CefrCode = code.parse().unwrap();
            assert_eq!(parsed.to_string(), code);
        }
    }

    #[test]
    fn test_cefr_code_parse_invalid() {
        let result: Result<CefrCode> = "D1".parse();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Unknown CEFR code"));
    }

    #[test]
    fn test_cefr_code_serialization() {
        let json = serde_json::to_string(&CefrCode::B1).unwrap();
        assert_eq!(json, "\"B1\"");

        let parsed: CefrCode = serde_json::from_str("\"C1\"").unwrap();
        assert_eq!(parsed, CefrCode::C1);
    }

    // Level entity

    #[test]
    fn test_level_creation() {
        let level = Level::new(
            CefrCode::B1,
            "Intermediate".to_string(),
            "Threshold level".to_string(),
        )
        .unwrap();

        assert_eq!(level.code, CefrCode::B1);
        assert_eq!(level.name, "Intermediate");
        assert_eq!(level.description, "Threshold level");
    }

    #[test]
    fn test_level_empty_name_valid() {
        let level = Level::new(CefrCode::A1, String::new(), String::new()).unwrap();
        assert!(level.name.is_empty());
    }

    #[test]
    fn test_level_name_101_chars_rejected() {
        let result = Level::new(CefrCode::A1, "a".repeat(101), String::new());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at most 100"));
    }

    // Lesson entity

    #[test]
    fn test_lesson_creation() {
        let level_id = Uuid::new_v4();
        let lesson = Lesson::new(
            level_id,
            "Present perfect".to_string(),
            "Have you ever...".to_string(),
            3,
        )
        .unwrap();

        assert_eq!(lesson.level_id, level_id);
        assert_eq!(lesson.title, "Present perfect");
        assert_eq!(lesson.position, 3);
    }

    #[test]
    fn test_lesson_empty_title_rejected() {
        let result = Lesson::new(Uuid::new_v4(), "   ".to_string(), String::new(), 0);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("title"));
    }

    #[test]
    fn test_lesson_title_200_chars_valid() {
        let result = Lesson::new(Uuid::new_v4(), "a".repeat(200), String::new(), 0);
        assert!(result.is_ok());
    }

    #[test]
    fn test_lesson_title_201_chars_rejected() {
        let result = Lesson::new(Uuid::new_v4(), "a".repeat(201), String::new(), 0);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("at most 200"));
    }

    #[test]
    fn test_lesson_negative_position_rejected() {
        let result = Lesson::new(Uuid::new_v4(), "Title".to_string(), String::new(), -1);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("negative"));
    }

    // Progress entity

    #[test]
    fn test_progress_creation_defaults() {
        let progress =
            Progress::new(Uuid::new_v4(), Uuid::new_v4(), false, None, None).unwrap();
        assert!(!progress.completed);
        assert!(progress.score.is_none());
        assert!(progress.completed_at.is_none());
    }

    #[test]
    fn test_progress_score_bounds() {
        let max: Decimal = "999.99".parse().unwrap();
        assert!(Progress::new(Uuid::new_v4(), Uuid::new_v4(), true, Some(max), None).is_ok());

        let over: Decimal = "1000.00".parse().unwrap();
        let result = Progress::new(Uuid::new_v4(), Uuid::new_v4(), true, Some(over), None);
        assert!(result.is_err());

        let negative: Decimal = "-0.01".parse().unwrap();
        let result = Progress::new(Uuid::new_v4(), Uuid::new_v4(), true, Some(negative), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_progress_serialization_roundtrip() {
        let score: Decimal = "87.50".parse().unwrap();
        let progress = Progress::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            true,
            Some(score),
            Some(Utc::now()),
        )
        .unwrap();

        let json = serde_json::to_string(&progress).unwrap();
        let deserialized: Progress = serde_json::from_str(&json).unwrap();

        assert_eq!(progress.id, deserialized.id);
        assert_eq!(progress.score, deserialized.score);
        assert_eq!(progress.completed, deserialized.completed);
    }
}
