//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use smartnode_domain::error::SmartNodeError;

/// JSON body returned when no resource matches the request path.
#[derive(Serialize)]
struct NotFoundBody {
    error: String,
}

/// Maps request failures to an HTTP response with appropriate status code.
#[derive(Debug)]
pub enum ApiError {
    /// No resource is registered at `path`.
    NotFound { path: String },
    /// The resource identified by `id` rejected the request.
    Resource { id: String, source: SmartNodeError },
}

impl ApiError {
    #[must_use]
    pub fn resource(id: impl Into<String>, source: impl Into<SmartNodeError>) -> Self {
        Self::Resource {
            id: id.into(),
            source: source.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { path } => (
                StatusCode::NOT_FOUND,
                Json(NotFoundBody {
                    error: format!("no resource at {path}"),
                }),
            )
                .into_response(),
            Self::Resource { id, source } => {
                let status = if source.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else if matches!(source, SmartNodeError::NotRunning) {
                    StatusCode::SERVICE_UNAVAILABLE
                } else {
                    tracing::error!(resource = %id, error = %source, "request failed");
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, Json(source.payload(&id))).into_response()
            }
        }
    }
}
