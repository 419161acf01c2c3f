//! Route definitions for the Tutoring domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{chat, conversations, messages};
use super::middleware::TutoringState;

/// Create conversation routes
fn conversation_routes() -> Router<TutoringState> {
    Router::new()
        .route(
            "/v1/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/v1/conversations/{id}",
            get(conversations::get_conversation)
                .put(conversations::update_conversation)
                .patch(conversations::update_conversation)
                .delete(conversations::delete_conversation),
        )
}

/// Create message routes
fn message_routes() -> Router<TutoringState> {
    Router::new()
        .route(
            "/v1/conversations/{conversation_id}/messages",
            get(messages::list_messages).post(messages::create_message),
        )
        .route(
            "/v1/messages",
            get(messages::list_all_messages).post(messages::create_flat_message),
        )
        .route("/v1/messages/{id}", get(messages::get_message))
}

/// Create chat routes
fn chat_routes() -> Router<TutoringState> {
    Router::new().route("/v1/chat", post(chat::chat))
}

/// Create all Tutoring domain API routes
pub fn routes() -> Router<TutoringState> {
    Router::new()
        .merge(conversation_routes())
        .merge(message_routes())
        .merge(chat_routes())
}
