//! Authorization context for authenticated users

use crate::types::AuthIdentity;

/// Represents an authenticated user context
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthIdentity,
}

impl AuthContext {
    /// Create new auth context for a user
    pub fn new(user: AuthIdentity) -> Self {
        Self { user }
    }

    /// Whether the context belongs to the given user id.
    ///
    /// Ownership checks on conversations and profiles go through this so
    /// the comparison lives in one place.
    pub fn owns(&self, user_id: uuid::Uuid) -> bool {
        self.user.id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn create_test_identity() -> AuthIdentity {
        AuthIdentity {
            id: Uuid::new_v4(),
            username: "testuser".to_string(),
            email: "test@example.com".to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_owns_own_id() {
        let identity = create_test_identity();
        let id = identity.id;
        let ctx = AuthContext::new(identity);

        assert!(ctx.owns(id));
        assert!(!ctx.owns(Uuid::new_v4()));
    }
}
