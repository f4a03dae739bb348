use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
    Json, Router,
};

use wardboard_auth::{default_grants, Action, Resource, Role};
use wardboard_core::UserId;

use crate::app::dto::{CreateUserRequest, SetPermissionsRequest, UpdateUserRequest};
use crate::app::errors::{json_error, service_error_to_response};
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/defaults/:role", get(role_defaults))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/:id/permissions", put(set_permissions))
}

pub async fn list_users(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::View) {
        return resp;
    }
    match services.list_users().await {
        Ok(users) => Json(users).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_user(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::View) {
        return resp;
    }
    let id: UserId = match parse_id(&id, "user") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_user(id).await {
        Ok(account) => Json(account).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

/// What a role's grants would be with no customization; the UI shows
/// this next to the per-account override editor.
pub async fn role_defaults(
    Extension(user): Extension<CurrentUser>,
    Path(role): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::View) {
        return resp;
    }
    match role.parse::<Role>() {
        Ok(role) => Json(default_grants(role)).into_response(),
        Err(_) => json_error(StatusCode::BAD_REQUEST, "invalid_role", "unknown role"),
    }
}

pub async fn create_user(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<CreateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::Edit) {
        return resp;
    }
    match services
        .create_user(&body.email, &body.name, body.role, &body.password)
        .await
    {
        Ok(account) => (StatusCode::CREATED, Json(account)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::Edit) {
        return resp;
    }
    let id: UserId = match parse_id(&id, "user") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services
        .update_user(id, body.name, body.role, body.status, body.password)
        .await
    {
        Ok(account) => Json(account).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn set_permissions(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<SetPermissionsRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::Edit) {
        return resp;
    }
    let id: UserId = match parse_id(&id, "user") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.set_user_grants(id, body.permissions).await {
        Ok(account) => Json(account).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Users, Action::Edit) {
        return resp;
    }
    let id: UserId = match parse_id(&id, "user") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_user(id, &user).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}
