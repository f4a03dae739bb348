use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use wardboard_auth::{Action, Resource};

use crate::app::errors::service_error_to_response;
use crate::app::services::WardServices;
use crate::authz::require;
use crate::context::CurrentUser;

/// GET /dashboard — per-collection counts (count-only queries plus a few
/// list-and-filter tallies).
pub async fn counts(
    Extension(services): Extension<Arc<WardServices>>,
    Extension(user): Extension<CurrentUser>,
) -> axum::response::Response {
    if let Err(resp) = require(&user, Resource::Dashboard, Action::View) {
        return resp;
    }
    match services.dashboard_counts().await {
        Ok(counts) => Json(counts).into_response(),
        Err(e) => service_error_to_response(e),
    }
}
