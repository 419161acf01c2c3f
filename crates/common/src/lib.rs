//! Shared utilities, configuration, and error handling for Lingua
//!
//! This crate provides common functionality used across the Lingua
//! application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Password hashing
//! - Common axum extractors

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;

pub use config::Config;
pub use crypto::{hash_password, verify_password};
pub use db::is_unique_violation;
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
