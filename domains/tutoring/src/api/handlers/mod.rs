//! HTTP handlers for the Tutoring domain

pub mod chat;
pub mod conversations;
pub mod messages;
