use axum::{
    routing::{get, post},
    Router,
};

pub mod auth;
pub mod callings;
pub mod common;
pub mod dashboard;
pub mod events;
pub mod fhe_groups;
pub mod lcr_tasks;
pub mod members;
pub mod survey;
pub mod system;
pub mod users;

/// Router for all authenticated endpoints. Sign-in and the health probe
/// are wired separately, outside the auth middleware.
pub fn router() -> Router {
    Router::new()
        .route("/auth/session", get(auth::session))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/dashboard", get(dashboard::counts))
        .nest("/members", members::router())
        .nest("/callings", callings::router())
        .nest("/fhe-groups", fhe_groups::router())
        .nest("/events", events::router())
        .nest("/survey", survey::router())
        .nest("/lcr-tasks", lcr_tasks::router())
        .nest("/users", users::router())
}
