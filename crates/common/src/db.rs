//! Shared database helpers for Lingua
//!
//! Repositories use runtime-checked queries against a shared `PgPool`;
//! the helpers here classify store-level failures so handlers can map
//! client-caused constraint violations to client errors.

use crate::error::Error;

/// Whether a sqlx error is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_unique_violation(),
        _ => false,
    }
}

/// Whether a sqlx error is a foreign-key violation.
pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => db.is_foreign_key_violation(),
        _ => false,
    }
}

/// Map an insert/update failure: uniqueness violations become a 409 with the
/// given message, foreign-key violations a 400, anything else stays a
/// database error.
pub fn map_constraint_violation(err: sqlx::Error, conflict_message: &str) -> Error {
    if is_unique_violation(&err) {
        Error::Conflict(conflict_message.to_string())
    } else if is_foreign_key_violation(&err) {
        Error::Validation("Referenced record does not exist".to_string())
    } else {
        Error::Database(err)
    }
}
