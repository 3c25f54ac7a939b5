//! External video platform abstraction
//!
//! The relay never talks to the hosting platform directly from a handler.
//! Handlers go through [`VideoPlatform`], which returns a typed
//! [`PlatformError`] so the HTTP mapping is an exhaustive match.

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::fs::File;

pub mod youtube;

/// Base of the canonical short link for an uploaded video
pub const SHORT_URL_BASE: &str = "https://youtu.be/";

/// Visibility of an uploaded video
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyStatus {
    #[default]
    Private,
    Public,
    Unlisted,
}

/// Descriptive part of the video resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_audio_language: Option<String>,
}

/// Publication part of the video resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatus {
    pub privacy_status: PrivacyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_at: Option<String>,
}

/// Metadata sent alongside the media body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoResource {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
}

/// An opened local file ready to be streamed
#[derive(Debug)]
pub struct VideoMedia {
    pub file: File,
    pub len: u64,
}

impl VideoMedia {
    /// Open a regular file for streaming
    ///
    /// Directories and other non-regular entries are reported as
    /// [`std::io::ErrorKind::NotFound`].
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} is not a regular file", path.display()),
            ));
        }

        let file = File::open(path).await?;
        Ok(Self {
            file,
            len: metadata.len(),
        })
    }
}

/// A video accepted by the platform
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadedVideo {
    pub id: String,
}

impl UploadedVideo {
    /// Canonical short URL of the video
    pub fn url(&self) -> String {
        format!("{}{}", SHORT_URL_BASE, self.id)
    }
}

/// Classified failure reported by the platform
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The access token was rejected or has expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The token lacks the scope or the channel lacks the permission
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The platform reported a missing resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other error reported by the platform
    #[error("{message}")]
    Unknown { code: Option<u16>, message: String },

    /// The platform could not be reached or its reply could not be read
    #[error("Transport error: {0}")]
    Transport(String),
}

impl PlatformError {
    /// Classify a numeric platform error code
    pub fn from_code(code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            401 => PlatformError::Unauthorized(message),
            403 => PlatformError::Forbidden(message),
            404 => PlatformError::NotFound(message),
            _ => PlatformError::Unknown {
                code: Some(code),
                message,
            },
        }
    }

    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            PlatformError::Unauthorized(_) => "unauthorized",
            PlatformError::Forbidden(_) => "forbidden",
            PlatformError::NotFound(_) => "not_found",
            PlatformError::Unknown { .. } => "unknown",
            PlatformError::Transport(_) => "transport",
        }
    }

    /// Platform supplied message
    pub fn message(&self) -> &str {
        match self {
            PlatformError::Unauthorized(message)
            | PlatformError::Forbidden(message)
            | PlatformError::NotFound(message)
            | PlatformError::Unknown { message, .. }
            | PlatformError::Transport(message) => message,
        }
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        // request URLs carry the upload session id
        PlatformError::Transport(e.without_url().to_string())
    }
}

/// Upload operation offered by a video platform
#[async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Create a video from `media` described by `resource`
    ///
    /// `access_token` is used as given for this single call.
    async fn insert_video(
        &self,
        access_token: &str,
        resource: &VideoResource,
        media: VideoMedia,
    ) -> Result<UploadedVideo, PlatformError>;
}
