use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use wardboard_auth::{Action, Resource};
use wardboard_core::TaskId;

use crate::app::errors::service_error_to_response;
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

/// Follow-up tasks mirror calling/membership changes, so they ride the
/// callings grant: viewing the queue needs callings view, working it
/// needs callings edit.
pub fn router() -> Router {
    Router::new()
        .route("/", get(list_tasks))
        .route("/:id", get(get_task))
        .route("/:id/complete", post(complete_task))
        .route("/:id/reopen", post(reopen_task))
}

#[derive(Debug, Deserialize)]
pub struct TaskFilter {
    #[serde(default)]
    pub completed: Option<bool>,
}

pub async fn list_tasks(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Query(filter): Query<TaskFilter>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::View) {
        return resp;
    }
    match services.list_tasks(filter.completed).await {
        Ok(tasks) => Json(tasks).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_task(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::View) {
        return resp;
    }
    let id: TaskId = match parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_task(id).await {
        Ok(task) => Json(task).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn complete_task(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    let id: TaskId = match parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.complete_task(id, &user).await {
        Ok(task) => Json(task).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn reopen_task(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Callings, Action::Edit) {
        return resp;
    }
    let id: TaskId = match parse_id(&id, "task") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.reopen_task(id).await {
        Ok(task) => Json(task).into_response(),
        Err(e) => service_error_to_response(e),
    }
}
