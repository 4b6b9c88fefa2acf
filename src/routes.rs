// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{course, interaction},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Binds the course resource routes under /api/courses.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let course_routes = Router::new()
        .route(
            "/",
            get(course::list_courses).post(course::create_course),
        )
        .route(
            "/{id}",
            put(course::update_course).delete(course::delete_course),
        )
        .route("/{id}/like", post(interaction::toggle_like))
        .route("/{id}/comment", post(interaction::add_comment))
        .route(
            "/{id}/comment/{comment_id}",
            delete(interaction::delete_comment),
        )
        .route("/user/{user_id}", get(course::list_user_courses))
        .route(
            "/user/{user_id}/comments",
            get(course::list_user_course_comments),
        )
        .route("/favorites/{user_id}", get(course::list_favorite_courses));

    Router::new()
        .nest("/api/courses", course_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
