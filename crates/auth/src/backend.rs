//! Concrete authentication backend
//!
//! Wraps `PgPool` + `AuthConfig` and owns the auth-specific SQL query.
//! Uses runtime `sqlx::query_as` (not macros) consistent with the
//! repositories in the domain crates.

use sqlx::PgPool;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::context::AuthContext;
use crate::error::AuthError;
use crate::jwt::validate_token;
use crate::types::AuthIdentity;

/// Concrete authentication backend.
///
/// Wraps a database pool and auth configuration. Domain states expose
/// this via `FromRef`:
/// ```ignore
/// impl FromRef<MyDomainState> for AuthBackend {
///     fn from_ref(state: &MyDomainState) -> Self {
///         state.auth.clone()
///     }
/// }
/// ```
#[derive(Clone)]
pub struct AuthBackend {
    pool: PgPool,
    config: AuthConfig,
}

impl AuthBackend {
    pub fn new(pool: PgPool, config: AuthConfig) -> Self {
        Self { pool, config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Find user identity by ID (everything except the password hash)
    pub(crate) async fn find_user(&self, id: Uuid) -> Result<Option<AuthIdentity>, AuthError> {
        let user: Option<AuthIdentity> = sqlx::query_as(
            r#"
            SELECT id, username, email, first_name, last_name,
                   created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = %id, "Failed to load user");
            AuthError::UserLoadError
        })?;

        Ok(user)
    }

    /// Validate a bearer token and load the caller's identity
    pub async fn authenticate(&self, token: &str) -> Result<AuthContext, AuthError> {
        let claims = validate_token(token, &self.config)?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;

        let user = self
            .find_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(AuthContext::new(user))
    }
}
