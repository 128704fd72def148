//! HTTP error handling
//!
//! Provides consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mindmesh_core::services::NodeServiceError;
use serde::{Deserialize, Serialize};

/// JSON error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpError {
    /// User-facing error message
    pub message: String,
    /// Machine-readable error code
    pub code: String,
    /// Optional detailed error information for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl HttpError {
    /// Create a new HTTP error
    pub fn new(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: None,
        }
    }

    /// Create a new HTTP error with details
    pub fn with_details(
        message: impl Into<String>,
        code: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            details: Some(details.into()),
        }
    }

    /// Shorthand for the standard not-found body
    pub fn node_not_found(id: impl std::fmt::Display) -> Self {
        Self::new(format!("Node not found: {}", id), "NODE_NOT_FOUND")
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = match self.code.as_str() {
            "NODE_NOT_FOUND" => StatusCode::NOT_FOUND,
            "INVALID_INPUT" | "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<NodeServiceError> for HttpError {
    fn from(err: NodeServiceError) -> Self {
        match err {
            NodeServiceError::InvalidId { id } => {
                HttpError::new(format!("Invalid node ID: {}", id), "INVALID_INPUT")
            }
            NodeServiceError::NodeNotFound { id } => HttpError::node_not_found(id),
            NodeServiceError::ValidationFailed(e) => {
                HttpError::new(e.to_string(), "VALIDATION_ERROR")
            }
            // Storage failures are logged server-side; the client gets a
            // generic message without internals.
            other => {
                tracing::error!("Internal error handling request: {}", other);
                HttpError::new("Internal server error", "INTERNAL_ERROR")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let not_found = HttpError::node_not_found(7).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let invalid = HttpError::new("bad", "INVALID_INPUT").into_response();
        assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

        let unknown = HttpError::new("boom", "SOMETHING_ELSE").into_response();
        assert_eq!(unknown.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_service_error_conversion_hides_internals() {
        let err = NodeServiceError::query_failed("connection refused at /var/db");
        let http: HttpError = err.into();
        assert_eq!(http.code, "INTERNAL_ERROR");
        assert!(!http.message.contains("/var/db"));
    }
}
