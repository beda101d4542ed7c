use crate::api::responses::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use shared::Error;

/// Handler-boundary error: a domain error plus the endpoint it came from
#[derive(Debug)]
pub struct ApiError {
    context: &'static str,
    error: Error,
}

impl ApiError {
    pub fn new(context: &'static str, error: Error) -> Self {
        Self { context, error }
    }

    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed", Error::MethodNotAllowed)
    }

    pub fn status(&self) -> StatusCode {
        match self.error {
            Error::MissingParameter(_) => StatusCode::BAD_REQUEST,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::ConfigurationMissing
            | Error::InvalidConfig(_)
            | Error::UpstreamHttp(_)
            | Error::UpstreamTransport(_)
            | Error::UpstreamDecode(_)
            | Error::InvalidResponse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short label for the `error` field of the response body
    fn label(&self) -> String {
        match self.error {
            Error::MissingParameter(_) | Error::MethodNotAllowed => self.error.to_string(),
            Error::ConfigurationMissing | Error::InvalidConfig(_) => "Configuration error".into(),
            _ => self.context.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse::new(self.label(), self.error.to_string());

        if status.is_server_error() {
            tracing::error!("{}: {}", body.error, body.message);
        } else {
            tracing::warn!("{}: {}", body.error, body.message);
        }

        (status, Json(body)).into_response()
    }
}
