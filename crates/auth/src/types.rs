//! Authentication read-model types

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Lightweight identity loaded for each authenticated request.
///
/// A subset of the accounts domain's `User` — everything except the
/// password hash.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AuthIdentity {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
