//! Repository implementations for the Accounts domain

pub mod memberships;
pub mod profiles;
pub mod users;

use sqlx::PgPool;

pub use memberships::MembershipRepository;
pub use profiles::ProfileRepository;
pub use users::UserRepository;

/// Combined repository access for the Accounts domain
#[derive(Clone)]
pub struct AccountsRepositories {
    pool: PgPool,
    pub users: UserRepository,
    pub profiles: ProfileRepository,
    pub memberships: MembershipRepository,
}

impl AccountsRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            memberships: MembershipRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get a reference to the underlying pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
