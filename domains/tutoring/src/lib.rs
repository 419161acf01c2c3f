//! Tutoring domain: conversations, messages, tutor turn handling

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Conversation, Message, MessageSender};
pub use domain::prompt::HISTORY_WINDOW;
pub use domain::service::{LevelRef, TurnOutcome, TurnStore, TutorService};

// Re-export repository types
pub use repository::{
    ConversationRepository, MessageRepository, PgTurnStore, TutoringRepositories,
};

// Re-export API types
pub use api::routes;
pub use api::TutoringState;
