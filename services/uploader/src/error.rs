//! Custom error types for the upload relay

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::platform::PlatformError;

/// Custom error type for the upload relay
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing or malformed bearer credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Required body fields are absent or empty
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// The body could not be read as an upload request
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The body exceeds the configured size limit
    #[error("Request body larger than {0} bytes")]
    PayloadTooLarge(usize),

    /// The referenced file is not readable on local disk
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The video platform rejected the upload
    #[error("Platform error: {source}")]
    Platform {
        source: PlatformError,
        expose_details: bool,
    },

    /// No route for the requested path and method
    #[error("No route for {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl ApiError {
    /// Wrap a platform error, keeping internal details only when allowed
    pub fn platform(source: PlatformError, expose_details: bool) -> Self {
        ApiError::Platform {
            source,
            expose_details,
        }
    }

    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::MissingFields(_) | ApiError::InvalidBody(_) | ApiError::FileNotFound(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Platform { source, .. } => match source {
                PlatformError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                PlatformError::Forbidden(_) => StatusCode::FORBIDDEN,
                PlatformError::NotFound(_) => StatusCode::NOT_FOUND,
                PlatformError::Unknown { .. } | PlatformError::Transport(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut body = Map::new();

        match self {
            ApiError::Unauthorized => {
                body.insert(
                    "error".into(),
                    "Authorization header missing or malformed".into(),
                );
                body.insert(
                    "message".into(),
                    "Expected 'Authorization: Bearer <token>'".into(),
                );
            }
            ApiError::MissingFields(fields) => {
                let details: Map<String, Value> = fields
                    .iter()
                    .map(|field| (field.to_string(), Value::from("required")))
                    .collect();
                body.insert("error".into(), "Validation failed".into());
                body.insert("message".into(), "filePath and title are required".into());
                body.insert("details".into(), Value::Object(details));
            }
            ApiError::InvalidBody(message) => {
                body.insert("error".into(), "Validation failed".into());
                body.insert("message".into(), message.into());
            }
            ApiError::PayloadTooLarge(limit) => {
                body.insert("error".into(), "Payload too large".into());
                body.insert(
                    "message".into(),
                    format!("Request body must not exceed {} bytes", limit).into(),
                );
            }
            ApiError::FileNotFound(path) => {
                body.insert("error".into(), "File not found".into());
                body.insert(
                    "message".into(),
                    format!("No readable file at {}", path).into(),
                );
                body.insert("details".into(), json!({ "filePath": path }));
            }
            ApiError::Platform {
                source,
                expose_details,
            } => {
                let error = match &source {
                    PlatformError::Unauthorized(_) => "Invalid or expired access token",
                    PlatformError::Forbidden(_) => "Insufficient permissions to upload video",
                    PlatformError::NotFound(_) => "Resource not found",
                    PlatformError::Unknown { .. } | PlatformError::Transport(_) => "Upload failed",
                };
                body.insert("error".into(), error.into());

                // transport messages are local detail, not platform text
                let message = match &source {
                    PlatformError::Transport(_) if !expose_details => {
                        "The video platform could not be reached"
                    }
                    _ => source.message(),
                };
                body.insert("message".into(), message.into());

                if expose_details {
                    match &source {
                        PlatformError::Unknown { code, .. } => {
                            body.insert(
                                "details".into(),
                                json!({ "kind": source.kind(), "code": code }),
                            );
                        }
                        PlatformError::Transport(_) => {
                            body.insert("details".into(), json!({ "kind": source.kind() }));
                        }
                        _ => {}
                    }
                }
            }
            ApiError::RouteNotFound { method, path } => {
                body.insert("error".into(), "Not found".into());
                body.insert("path".into(), path.into());
                body.insert("method".into(), method.into());
            }
            ApiError::InternalServerError => {
                body.insert("error".into(), "Internal server error".into());
            }
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_missing_fields_lists_each_field() {
        let (status, body) = body_of(ApiError::MissingFields(vec!["title"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"], json!({ "title": "required" }));
    }

    #[tokio::test]
    async fn test_platform_errors_map_to_status() {
        let cases = [
            (PlatformError::from_code(401, "expired"), StatusCode::UNAUTHORIZED),
            (PlatformError::from_code(403, "scope"), StatusCode::FORBIDDEN),
            (PlatformError::from_code(404, "missing"), StatusCode::NOT_FOUND),
            (
                PlatformError::from_code(500, "backend"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (source, expected) in cases {
            let (status, body) = body_of(ApiError::platform(source, false)).await;
            assert_eq!(status, expected);
            assert!(body["error"].is_string());
            assert!(body.get("details").is_none());
        }
    }

    #[tokio::test]
    async fn test_unknown_details_only_in_development() {
        let source = PlatformError::from_code(502, "bad gateway");
        let (_, body) = body_of(ApiError::platform(source, true)).await;
        assert_eq!(body["details"]["code"], 502);
        assert_eq!(body["message"], "bad gateway");
    }

    #[tokio::test]
    async fn test_transport_message_hidden_outside_development() {
        let message = "error sending request for url (https://upload.example/session?upload_id=42)";

        let (status, body) =
            body_of(ApiError::platform(PlatformError::Transport(message.to_string()), false))
                .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Upload failed");
        assert!(!body.to_string().contains("upload_id"));
        assert!(body.get("details").is_none());

        let (_, body) =
            body_of(ApiError::platform(PlatformError::Transport(message.to_string()), true))
                .await;
        assert_eq!(body["message"], message);
        assert_eq!(body["details"]["kind"], "transport");
    }

    #[tokio::test]
    async fn test_payload_too_large() {
        let (status, body) = body_of(ApiError::PayloadTooLarge(64)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["error"], "Payload too large");
    }

    #[tokio::test]
    async fn test_route_not_found_echoes_request() {
        let (status, body) = body_of(ApiError::RouteNotFound {
            method: "DELETE".to_string(),
            path: "/videos".to_string(),
        })
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["path"], "/videos");
        assert_eq!(body["method"], "DELETE");
    }
}
