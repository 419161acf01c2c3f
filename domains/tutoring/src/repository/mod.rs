//! Repository implementations for the Tutoring domain

pub mod conversations;
pub mod messages;
pub mod store;

use sqlx::PgPool;

pub use conversations::ConversationRepository;
pub use messages::MessageRepository;
pub use store::PgTurnStore;

/// Combined repository access for the Tutoring domain
#[derive(Clone)]
pub struct TutoringRepositories {
    pool: PgPool,
    pub conversations: ConversationRepository,
    pub messages: MessageRepository,
}

impl TutoringRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            conversations: ConversationRepository::new(pool.clone()),
            messages: MessageRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool (for cross-domain reads)
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
