//! Catalog domain: CEFR levels, lessons, per-lesson progress

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{CefrCode, Lesson, Level, Progress};

// Re-export repository types
pub use repository::{CatalogRepositories, LessonRepository, LevelRepository, ProgressRepository};

// Re-export API types
pub use api::routes;
pub use api::CatalogState;
