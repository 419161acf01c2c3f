//! Route definitions for the Accounts domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{auth, memberships, profiles, users};
use super::middleware::AccountsState;

/// Create user account routes
fn user_routes() -> Router<AccountsState> {
    Router::new()
        .route("/v1/users", get(users::list_users).post(users::create_user))
        .route(
            "/v1/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
}

/// Create auth routes
fn auth_routes() -> Router<AccountsState> {
    Router::new().route("/v1/auth/login", post(auth::login))
}

/// Create profile routes
fn profile_routes() -> Router<AccountsState> {
    Router::new()
        .route(
            "/v1/profiles",
            get(profiles::list_profiles).post(profiles::create_profile),
        )
        .route(
            "/v1/profiles/{id}",
            get(profiles::get_profile)
                .put(profiles::update_profile)
                .patch(profiles::update_profile)
                .delete(profiles::delete_profile),
        )
}

/// Create membership routes
fn membership_routes() -> Router<AccountsState> {
    Router::new()
        .route(
            "/v1/memberships",
            get(memberships::list_memberships).post(memberships::create_membership),
        )
        .route(
            "/v1/memberships/{id}",
            get(memberships::get_membership)
                .put(memberships::update_membership)
                .patch(memberships::update_membership)
                .delete(memberships::delete_membership),
        )
}

/// Create all Accounts domain API routes
pub fn routes() -> Router<AccountsState> {
    Router::new()
        .merge(user_routes())
        .merge(auth_routes())
        .merge(profile_routes())
        .merge(membership_routes())
}
