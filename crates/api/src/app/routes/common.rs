use std::str::FromStr;

use axum::http::StatusCode;

use crate::app::errors::json_error;

/// Parse a path segment into a typed id, mapping failure to a 400.
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, axum::response::Response> {
    raw.parse().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "invalid_id",
            format!("invalid {what} id"),
        )
    })
}
