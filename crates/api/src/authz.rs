//! Server-side authorization guard.
//!
//! Every handler calls `require` before touching the service layer, so a
//! request that skips the UI entirely is still held to the same grants
//! the UI renders from.

use axum::http::StatusCode;

use wardboard_auth::{is_granted, Action, Resource};

use crate::app::errors::json_error;
use crate::context::CurrentUser;

/// Check that the current operator holds the grant for this
/// resource/action pair. Denial is a ready-to-return 403 response.
pub fn require(
    user: &CurrentUser,
    resource: Resource,
    action: Action,
) -> Result<(), axum::response::Response> {
    if is_granted(Some(user.identity()), resource, action) {
        Ok(())
    } else {
        Err(json_error(
            StatusCode::FORBIDDEN,
            "forbidden",
            format!("missing {action:?} grant on {resource:?}").to_lowercase(),
        ))
    }
}
