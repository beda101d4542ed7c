use crate::api::ApiError;
use axum::http::StatusCode;

/// Any method other than GET or OPTIONS on the API routes
pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

/// Any path without a route
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}
