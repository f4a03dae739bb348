use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use wardboard_auth::{Action, Resource};
use wardboard_calendar::EventDraft;
use wardboard_core::EventId;

use crate::app::errors::service_error_to_response;
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/:id", get(get_event).put(update_event).delete(delete_event))
}

pub async fn list_events(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Calendar, Action::View) {
        return resp;
    }
    match services.list_events().await {
        Ok(events) => Json(events).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_event(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Calendar, Action::View) {
        return resp;
    }
    let id: EventId = match parse_id(&id, "event") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_event(id).await {
        Ok(event) => Json(event).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn create_event(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(draft): Json<EventDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Calendar, Action::Edit) {
        return resp;
    }
    match services.create_event(draft).await {
        Ok(event) => (StatusCode::CREATED, Json(event)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn update_event(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(draft): Json<EventDraft>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Calendar, Action::Edit) {
        return resp;
    }
    let id: EventId = match parse_id(&id, "event") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.update_event(id, draft).await {
        Ok(event) => Json(event).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn delete_event(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Calendar, Action::Edit) {
        return resp;
    }
    let id: EventId = match parse_id(&id, "event") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.delete_event(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => service_error_to_response(e),
    }
}
