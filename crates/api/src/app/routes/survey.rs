use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};

use wardboard_auth::{Action, Resource};
use wardboard_core::ResponseId;
use wardboard_survey::SurveySubmission;

use crate::app::dto::SetProcessedRequest;
use crate::app::errors::service_error_to_response;
use crate::app::routes::common::parse_id;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

pub fn router() -> Router {
    Router::new()
        // The intake form itself: any signed-in account with a survey
        // edit grant (every role has one) can submit.
        .route("/responses", post(submit_response).get(list_responses))
        .route("/responses/:id", get(get_response))
        .route("/responses/:id/processed", put(set_processed))
        .route("/responses/:id/create-member", post(create_member))
}

pub async fn submit_response(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(submission): Json<SurveySubmission>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Survey, Action::Edit) {
        return resp;
    }
    match services.submit_response(submission).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn list_responses(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::SurveyResponses, Action::View) {
        return resp;
    }
    match services.list_responses().await {
        Ok(responses) => Json(responses).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn get_response(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::SurveyResponses, Action::View) {
        return resp;
    }
    let id: ResponseId = match parse_id(&id, "response") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.get_response(id).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

pub async fn set_processed(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(body): Json<SetProcessedRequest>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::SurveyResponses, Action::Edit) {
        return resp;
    }
    let id: ResponseId = match parse_id(&id, "response") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.set_response_processed(id, body.processed).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => service_error_to_response(e),
    }
}

/// Consumes the response into a directory entry; the response row stays
/// behind, flagged processed.
pub async fn create_member(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Members, Action::Edit) {
        return resp;
    }
    let id: ResponseId = match parse_id(&id, "response") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    match services.create_member_from_response(id, &user).await {
        Ok(member) => (StatusCode::CREATED, Json(member)).into_response(),
        Err(e) => service_error_to_response(e),
    }
}
