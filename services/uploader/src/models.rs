//! API models for request and response payloads

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::ApiError,
    platform::{PrivacyStatus, UploadedVideo, VideoResource, VideoSnippet, VideoStatus},
};

/// Request for a video upload
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_path: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub privacy_status: Option<PrivacyStatus>,
    pub publish_at: Option<String>,
    pub default_language: Option<String>,
    pub default_audio_language: Option<String>,
}

/// An upload request that passed field validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedUpload {
    pub file_path: String,
    pub resource: VideoResource,
}

/// Required body fields, in the order they are reported
const REQUIRED_FIELDS: [&str; 2] = ["filePath", "title"];

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl UploadRequest {
    /// Validate a raw JSON body
    ///
    /// Required fields are checked on the raw value first, so a body that
    /// lacks them is reported as such even when other fields are mistyped.
    pub fn from_json(body: Value) -> Result<ValidatedUpload, ApiError> {
        let missing: Vec<&'static str> = REQUIRED_FIELDS
            .into_iter()
            .filter(|field| {
                !body
                    .get(*field)
                    .and_then(Value::as_str)
                    .is_some_and(|value| !value.is_empty())
            })
            .collect();

        if !missing.is_empty() {
            return Err(ApiError::MissingFields(missing));
        }

        let request: UploadRequest =
            serde_json::from_value(body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;
        request.validate()
    }

    /// Check required fields and assemble the outbound video resource
    ///
    /// Empty optional strings are treated as absent.
    pub fn validate(self) -> Result<ValidatedUpload, ApiError> {
        let file_path = non_empty(self.file_path);
        let title = non_empty(self.title);

        let (file_path, title) = match (file_path, title) {
            (Some(file_path), Some(title)) => (file_path, title),
            (file_path, title) => {
                let mut missing = Vec::new();
                if file_path.is_none() {
                    missing.push("filePath");
                }
                if title.is_none() {
                    missing.push("title");
                }
                return Err(ApiError::MissingFields(missing));
            }
        };

        let resource = VideoResource {
            snippet: VideoSnippet {
                title,
                description: self.description.unwrap_or_default(),
                tags: self.tags.unwrap_or_default(),
                default_language: non_empty(self.default_language),
                default_audio_language: non_empty(self.default_audio_language),
            },
            status: VideoStatus {
                privacy_status: self.privacy_status.unwrap_or_default(),
                publish_at: non_empty(self.publish_at),
            },
        };

        Ok(ValidatedUpload {
            file_path,
            resource,
        })
    }
}

/// Response for a completed upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub id: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<UploadedVideo> for UploadResponse {
    fn from(video: UploadedVideo) -> Self {
        Self {
            success: true,
            url: video.url(),
            id: video.id,
            uploaded_at: Utc::now(),
        }
    }
}

/// Response for the liveness check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    /// Seconds since process start
    pub uptime: f64,
    pub environment: String,
    pub port: u16,
}

/// Response describing the service
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            message: "YouTube upload relay",
            endpoints: BTreeMap::from([
                ("GET /", "Service description"),
                ("GET /health", "Liveness information"),
                (
                    "POST /upload",
                    "Upload a local video file (requires Authorization: Bearer <token>)",
                ),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> UploadRequest {
        serde_json::from_value(value).expect("valid request json")
    }

    #[test]
    fn test_defaults_are_applied() {
        let upload = request(json!({ "filePath": "/tmp/a.mp4", "title": "A" }))
            .validate()
            .unwrap();

        assert_eq!(upload.file_path, "/tmp/a.mp4");
        assert_eq!(upload.resource.snippet.description, "");
        assert!(upload.resource.snippet.tags.is_empty());
        assert_eq!(upload.resource.status.privacy_status, PrivacyStatus::Private);
        assert_eq!(upload.resource.status.publish_at, None);
        assert_eq!(upload.resource.snippet.default_language, None);
    }

    #[test]
    fn test_missing_fields_are_reported() {
        let err = request(json!({ "description": "x" })).validate().unwrap_err();
        match err {
            ApiError::MissingFields(fields) => assert_eq!(fields, vec!["filePath", "title"]),
            other => panic!("unexpected error: {:?}", other),
        }

        let err = request(json!({ "filePath": "/tmp/a.mp4", "title": "" }))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(fields) if fields == vec!["title"]));
    }

    #[test]
    fn test_supplied_values_are_kept_verbatim() {
        let upload = request(json!({
            "filePath": "/videos/b.mov",
            "title": "B",
            "description": "desc",
            "tags": ["one", "two"],
            "privacyStatus": "unlisted",
            "publishAt": "2026-12-24T18:00:00Z",
            "defaultLanguage": "pt-BR",
            "defaultAudioLanguage": ""
        }))
        .validate()
        .unwrap();

        let snippet = &upload.resource.snippet;
        assert_eq!(snippet.tags, vec!["one", "two"]);
        assert_eq!(snippet.default_language.as_deref(), Some("pt-BR"));
        assert_eq!(snippet.default_audio_language, None);
        assert_eq!(
            upload.resource.status.publish_at.as_deref(),
            Some("2026-12-24T18:00:00Z")
        );
        assert_eq!(upload.resource.status.privacy_status, PrivacyStatus::Unlisted);
    }

    #[test]
    fn test_unknown_privacy_status_is_rejected() {
        let result = serde_json::from_value::<UploadRequest>(json!({
            "filePath": "/tmp/a.mp4",
            "title": "A",
            "privacyStatus": "friends"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_fields_reported_before_type_errors() {
        let err = UploadRequest::from_json(json!({ "title": "T", "tags": "a,b" })).unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(fields) if fields == vec!["filePath"]));

        let err = UploadRequest::from_json(json!({ "privacyStatus": "friends" })).unwrap_err();
        assert!(
            matches!(err, ApiError::MissingFields(fields) if fields == vec!["filePath", "title"])
        );

        let err = UploadRequest::from_json(json!({ "filePath": 7, "title": "T" })).unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(fields) if fields == vec!["filePath"]));

        let err = UploadRequest::from_json(json!(["filePath", "title"])).unwrap_err();
        assert!(matches!(err, ApiError::MissingFields(fields) if fields.len() == 2));
    }

    #[test]
    fn test_mistyped_optional_field_with_required_present() {
        let err = UploadRequest::from_json(json!({
            "filePath": "/tmp/a.mp4",
            "title": "T",
            "tags": "a,b"
        }))
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidBody(_)));

        let upload = UploadRequest::from_json(json!({ "filePath": "/tmp/a.mp4", "title": "T" }))
            .unwrap();
        assert_eq!(upload.resource.snippet.title, "T");
    }

    #[test]
    fn test_upload_response_url() {
        let response = UploadResponse::from(UploadedVideo {
            id: "abc123".to_string(),
        });
        assert!(response.success);
        assert_eq!(response.url, "https://youtu.be/abc123");
    }
}
