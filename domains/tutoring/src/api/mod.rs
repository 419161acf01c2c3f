//! API layer for the Tutoring domain
//!
//! Contains HTTP handlers, routes, and domain state definition.

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::TutoringState;
pub use routes::routes;
