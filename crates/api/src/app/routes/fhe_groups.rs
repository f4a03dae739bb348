use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use wardboard_auth::{Action, Resource};
use wardboard_core::{GroupId, MemberId};
use wardboard_groups::GroupDraft;

use crate::app::dto::GroupMemberRequest;
use crate::app::errors::service_error_to_response;
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_groups).post(create_group))
        .route("/:id", get(get_group).put(update_group).delete(delete_group))
        .route("/:id/roster", get(roster))
        .route("/:id/members", post(add_member))
        .route("/:id/members/:member_id", delete(remove_member))
}

pub async fn list_groups(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::View) {
        return resp;
    }
    match services.list_groups().await {
        Ok(groups) => Json(groups).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_group(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::View) {
        return resp;
    }
    let id: GroupId = match parse_id(&id, "group") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_group(id).await {
        Ok(group) => Json(group).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn roster(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::View) {
        return resp;
    }
    let id: GroupId = match parse_id(&id, "group") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.group_roster(id).await {
        Ok(members) => Json(members).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn create_group(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<GroupDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::Edit) {
        return resp;
    }
    match services.create_group(draft).await {
        Ok(group) => (StatusCode::CREATED, Json(group)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn update_group(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(draft): Json<GroupDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::Edit) {
        return resp;
    }
    let id: GroupId = match parse_id(&id, "group") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_group(id, draft).await {
        Ok(group) => Json(group).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn delete_group(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::Edit) {
        return resp;
    }
    let id: GroupId = match parse_id(&id, "group") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_group(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn add_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<GroupMemberRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::Edit) {
        return resp;
    }
    let id: GroupId = match parse_id(&id, "group") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.add_group_member(id, body.member_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn remove_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path((id, member_id)): Path<(String, String)>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::FheGroups, Action::Edit) {
        return resp;
    }
    let id: GroupId = match parse_id(&id, "group") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let member_id: MemberId = match parse_id(&member_id, "member") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.remove_group_member(id, member_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}
