use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};

use wardboard_infra::SessionToken;

use crate::app::errors::{json_error, service_error_to_response};
use crate::app::dto::{SignInRequest, SignInResponse};
use crate::app::services::WardServices;
use crate::context::CurrentUser;

/// POST /auth/sign-in — the only unauthenticated mutation in the API.
pub async fn sign_in(
    Extension(services): Extension<Arc<WardServices>>,
    Json(body): Json<SignInRequest>,
) -> axum::response::Response {
    match services.sign_in(&body.email, &body.password).await {
        Ok((token, user)) => Json(SignInResponse { token, user }).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

/// POST /auth/sign-out — revokes the presented bearer token.
pub async fn sign_out(
    Extension(services): Extension<Arc<WardServices>>,
    headers: HeaderMap,
) -> axum::response::Response {
    let Some(token) = bearer_token(&headers) else {
        return json_error(StatusCode::UNAUTHORIZED, "unauthorized", "missing bearer token");
    };
    match services.sign_out(&token).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}

/// GET /auth/session — the identity behind the current token.
pub async fn session(Extension(user): Extension<CurrentUser>) -> axum::response::Response {
    Json(user.identity().clone()).into_response()
}

fn bearer_token(headers: &HeaderMap) -> Option<SessionToken> {
    headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?
        .trim()
        .parse()
        .ok()
}
