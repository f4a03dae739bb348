//! HTTP application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store wiring and every multi-step workflow
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};
use tower::ServiceBuilder;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
///
/// With `DATABASE_URL` set the record stores are Postgres-backed;
/// without it everything is in-memory (dev/test). Sessions are
/// process-local either way.
pub async fn build_app() -> anyhow::Result<Router> {
    let services = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::PgPool::connect(&url).await?;
            tracing::info!("using postgres-backed stores");
            Arc::new(services::WardServices::postgres(pool))
        }
        Err(_) => {
            tracing::info!("DATABASE_URL not set; using in-memory stores");
            Arc::new(services::WardServices::in_memory())
        }
    };

    let auth_state = middleware::AuthState {
        services: services.clone(),
    };

    // Protected routes: require a resolved session.
    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Ok(Router::new()
        .route("/health", get(routes::system::health))
        .route("/auth/sign-in", post(routes::auth::sign_in))
        .merge(protected)
        .layer(Extension(services))
        .layer(ServiceBuilder::new()))
}
