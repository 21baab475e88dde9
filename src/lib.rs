//! Server library - exposes the modules and the router for the binary and the
//! integration tests.

pub mod core;
pub mod dtos;
pub mod entities;
pub mod monitoring;
pub mod repositories;
pub mod services;

pub use crate::core::{AppError, AppState, auth, config};
pub use crate::services::root;

use axum::{
    Router, middleware,
    routing::{delete, get, patch, post},
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Builds the full application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    use crate::services::{health, root};

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/auth", configure_auth_routes())
        .nest("/users", configure_user_routes(state.clone()))
        .nest("/assignments", configure_assignment_routes(state.clone()))
        .nest("/students", configure_student_routes(state.clone()))
        .nest("/activities", configure_activity_routes(state.clone()))
        .nest(
            "/qualifications",
            configure_qualification_routes(state.clone()),
        )
        .nest("/sessions", configure_session_routes(state.clone()))
        .nest("/cvs", configure_cv_routes(state.clone()))
        .nest("/messages", configure_message_routes(state.clone()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Login and registration, the only routes reachable without a token.
fn configure_auth_routes() -> Router<Arc<AppState>> {
    use crate::services::auth::*;
    Router::new()
        .route("/login", post(login_user))
        .route("/register", post(register_user))
}

fn configure_user_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::user::*;

    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/me", get(get_me))
        .route(
            "/{user_id}",
            get(get_user_by_id).patch(update_user).delete(delete_user),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_assignment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::assignment::*;

    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route("/{assignment_id}", delete(delete_assignment))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

/// Read-only views of one student's records. The student-access middleware
/// decides who may look: the student themselves, their assigned mentors, or
/// an admin.
fn configure_student_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::{authentication_middleware, student_access_middleware};
    use crate::services::{activity, cv, qualification, session};

    Router::new()
        .route(
            "/{student_id}/activities",
            get(activity::list_for_student),
        )
        .route(
            "/{student_id}/qualifications",
            get(qualification::list_for_student),
        )
        .route("/{student_id}/sessions", get(session::list_for_student))
        .route("/{student_id}/cvs", get(cv::list_for_student))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            student_access_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_activity_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::activity::*;

    Router::new()
        .route("/", post(create_activity))
        .route(
            "/{activity_id}",
            patch(update_activity).delete(delete_activity),
        )
        .route("/{activity_id}/status", patch(set_activity_status))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_qualification_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::qualification::*;

    Router::new()
        .route("/", post(create_qualification))
        .route(
            "/{qualification_id}",
            patch(update_qualification).delete(delete_qualification),
        )
        .route(
            "/{qualification_id}/status",
            patch(set_qualification_status),
        )
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_session_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::session::*;

    Router::new()
        .route("/", post(create_session))
        .route(
            "/{session_id}",
            patch(update_session).delete(delete_session),
        )
        .route("/{session_id}/status", patch(set_session_status))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_cv_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::cv::*;

    Router::new()
        .route("/", post(upload_cv))
        .route("/{cv_id}", delete(delete_cv))
        .route("/{cv_id}/status", patch(set_cv_status))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}

fn configure_message_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    use crate::core::authentication_middleware;
    use crate::services::message::*;

    Router::new()
        .route("/", post(send_message))
        .route("/conversations", get(list_conversations))
        .route("/conversations/{peer_id}", get(get_conversation))
        .route(
            "/conversations/{peer_id}/read",
            post(mark_conversation_read),
        )
        .route("/unread", get(unread_count))
        .layer(middleware::from_fn_with_state(
            state,
            authentication_middleware,
        ))
}
