//! Route definitions for the Catalog domain API

use axum::{routing::get, Router};

use super::handlers::{lessons, levels, progress};
use super::middleware::CatalogState;

/// Create level routes
fn level_routes() -> Router<CatalogState> {
    Router::new()
        .route(
            "/v1/levels",
            get(levels::list_levels).post(levels::create_level),
        )
        .route(
            "/v1/levels/{id}",
            get(levels::get_level)
                .put(levels::update_level)
                .patch(levels::update_level)
                .delete(levels::delete_level),
        )
}

/// Create lesson routes
fn lesson_routes() -> Router<CatalogState> {
    Router::new()
        .route(
            "/v1/lessons",
            get(lessons::list_lessons).post(lessons::create_lesson),
        )
        .route(
            "/v1/lessons/{id}",
            get(lessons::get_lesson)
                .put(lessons::update_lesson)
                .patch(lessons::update_lesson)
                .delete(lessons::delete_lesson),
        )
}

/// Create progress routes
fn progress_routes() -> Router<CatalogState> {
    Router::new()
        .route(
            "/v1/progress",
            get(progress::list_progress).post(progress::create_progress),
        )
        .route(
            "/v1/progress/{id}",
            get(progress::get_progress)
                .put(progress::update_progress)
                .patch(progress::update_progress)
                .delete(progress::delete_progress),
        )
}

/// Create all Catalog domain API routes
pub fn routes() -> Router<CatalogState> {
    Router::new()
        .merge(level_routes())
        .merge(lesson_routes())
        .merge(progress_routes())
}
