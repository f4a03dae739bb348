use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use wardboard_auth::{Action, Resource};
use wardboard_callings::CallingDraft;
use wardboard_core::CallingId;

use crate::app::dto::AssignCallingRequest;
use crate::app::errors::service_error_to_response;
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_callings).post(create_calling))
        .route("/vacant", get(list_vacant))
        .route(
            "/:id",
            get(get_calling).put(update_calling).delete(delete_calling),
        )
        .route("/:id/assign", post(assign_calling))
        .route("/:id/release", post(release_calling))
}

pub async fn list_callings(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::View) {
        return resp;
    }
    match services.list_callings().await {
        Ok(callings) => Json(callings).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn list_vacant(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::View) {
        return resp;
    }
    match services.vacant_callings().await {
        Ok(callings) => Json(callings).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_calling(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::View) {
        return resp;
    }
    let id: CallingId = match parse_id(&id, "calling") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_calling(id).await {
        Ok(calling) => Json(calling).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn create_calling(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<CallingDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    match services.create_calling(draft).await {
        Ok(calling) => (StatusCode::CREATED, Json(calling)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

/// Edit-form path; sustained / set-apart transitions queue follow-up
/// tasks as a side effect.
pub async fn update_calling(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(draft): Json<CallingDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    let id: CallingId = match parse_id(&id, "calling") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_calling(id, draft, &user).await {
        Ok(calling) => Json(calling).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn assign_calling(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<AssignCallingRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    let id: CallingId = match parse_id(&id, "calling") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.assign_calling(id, body.member_id, &user).await {
        Ok(calling) => Json(calling).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn release_calling(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    let id: CallingId = match parse_id(&id, "calling") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.release_calling(id, &user).await {
        Ok(calling) => Json(calling).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn delete_calling(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    let id: CallingId = match parse_id(&id, "calling") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_calling(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}
