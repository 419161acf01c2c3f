//! Repository implementations for the Catalog domain

pub mod lessons;
pub mod levels;
pub mod progress;

use sqlx::PgPool;

pub use lessons::LessonRepository;
pub use levels::LevelRepository;
pub use progress::ProgressRepository;

/// Combined repository access for the Catalog domain
#[derive(Clone)]
pub struct CatalogRepositories {
    pool: PgPool,
    pub levels: LevelRepository,
    pub lessons: LessonRepository,
    pub progress: ProgressRepository,
}

impl CatalogRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            levels: LevelRepository::new(pool.clone()),
            lessons: LessonRepository::new(pool.clone()),
            progress: ProgressRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
