use axum::{http::StatusCode, response::Response};

use super::ErrorBody;

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    ErrorBody::new("Not found").into_response_with(StatusCode::NOT_FOUND)
}

pub async fn method_not_allowed() -> Response {
    ErrorBody::new("Method not allowed").into_response_with(StatusCode::METHOD_NOT_ALLOWED)
}
