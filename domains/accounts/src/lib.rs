//! Accounts domain: user accounts, profiles, level membership history

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{LevelMembership, User, UserProfile};

// Re-export repository types
pub use repository::{
    AccountsRepositories, MembershipRepository, ProfileRepository, UserRepository,
};

// Re-export API types
pub use api::routes;
pub use api::AccountsState;
