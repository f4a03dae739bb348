use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use wardboard_auth::{Action, Resource};
use wardboard_core::MemberId;
use wardboard_directory::MemberDraft;

use crate::app::errors::service_error_to_response;
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_members).post(create_member))
        .route("/unassigned", get(list_unassigned))
        .route(
            "/:id",
            get(get_member).put(update_member).delete(delete_member),
        )
}

pub async fn list_members(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::View) {
        return resp;
    }
    match services.list_members().await {
        Ok(members) => Json(members).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn list_unassigned(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::View) {
        return resp;
    }
    match services.unassigned_members().await {
        Ok(members) => Json(members).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::View) {
        return resp;
    }
    let id: MemberId = match parse_id(&id, "member") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_member(id).await {
        Ok(member) => Json(member).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn create_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<MemberDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::Edit) {
        return resp;
    }
    match services.create_member(draft).await {
        Ok(member) => (StatusCode::CREATED, Json(member)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn update_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(draft): Json<MemberDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::Edit) {
        return resp;
    }
    let id: MemberId = match parse_id(&id, "member") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_member(id, draft).await {
        Ok(member) => Json(member).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn delete_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::Edit) {
        return resp;
    }
    let id: MemberId = match parse_id(&id, "member") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_member(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}
