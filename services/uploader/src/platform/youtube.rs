//! YouTube Data API v3 upload client
//!
//! Uploads use the resumable protocol: a metadata request opens an upload
//! session and returns its URI in the `Location` header, then the media is
//! streamed to that URI in a single request.

use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{CONTENT_LENGTH, CONTENT_TYPE, LOCATION},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use super::{PlatformError, UploadedVideo, VideoMedia, VideoPlatform, VideoResource};

/// Content type announced for the media body
const VIDEO_CONTENT_TYPE: &str = "video/*";

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleError,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    code: Option<u16>,
    message: Option<String>,
    #[serde(default)]
    errors: Vec<GoogleErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorItem {
    message: Option<String>,
}

/// YouTube upload client
#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    upload_url: String,
}

impl YouTubeClient {
    /// Create a new client for the given upload endpoint
    pub fn new(upload_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            upload_url: upload_url.into(),
        }
    }

    /// Open a resumable upload session and return its URI
    async fn start_session(
        &self,
        access_token: &str,
        resource: &VideoResource,
        media_len: u64,
    ) -> Result<reqwest::Url, PlatformError> {
        let response = self
            .http
            .post(&self.upload_url)
            .query(&[("uploadType", "resumable"), ("part", "snippet,status")])
            .bearer_auth(access_token)
            .header("X-Upload-Content-Type", VIDEO_CONTENT_TYPE)
            .header("X-Upload-Content-Length", media_len.to_string())
            .json(resource)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                PlatformError::Transport(
                    "Upload session response did not include a Location header".to_string(),
                )
            })?;

        response
            .url()
            .join(location)
            .map_err(|e| PlatformError::Transport(format!("Invalid upload session URI: {}", e)))
    }

    /// Stream the media body to an open session
    async fn transfer(
        &self,
        access_token: &str,
        session_uri: reqwest::Url,
        media: VideoMedia,
    ) -> Result<UploadedVideo, PlatformError> {
        let len = media.len;
        let body = reqwest::Body::wrap_stream(ReaderStream::new(media.file));

        let response = self
            .http
            .put(session_uri)
            .bearer_auth(access_token)
            .header(CONTENT_TYPE, VIDEO_CONTENT_TYPE)
            .header(CONTENT_LENGTH, len.to_string())
            .body(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        response.json::<UploadedVideo>().await.map_err(|e| {
            PlatformError::Transport(format!(
                "Failed to decode upload response: {}",
                e.without_url()
            ))
        })
    }
}

#[async_trait]
impl VideoPlatform for YouTubeClient {
    async fn insert_video(
        &self,
        access_token: &str,
        resource: &VideoResource,
        media: VideoMedia,
    ) -> Result<UploadedVideo, PlatformError> {
        let session_uri = self.start_session(access_token, resource, media.len).await?;
        debug!("Upload session opened");

        let video = self.transfer(access_token, session_uri, media).await?;
        info!(video_id = %video.id, "Video accepted by YouTube");

        Ok(video)
    }
}

/// Turn a non-success response into a classified error
///
/// The message prefers `error.errors[0].message`, then `error.message`,
/// then the HTTP reason phrase.
async fn error_from_response(response: Response) -> PlatformError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let (code, message) = match serde_json::from_str::<GoogleErrorResponse>(&body) {
        Ok(GoogleErrorResponse { error }) => {
            let message = error
                .errors
                .into_iter()
                .find_map(|item| item.message)
                .or(error.message);
            (error.code.unwrap_or(status.as_u16()), message)
        }
        Err(_) => (status.as_u16(), None),
    };

    let message = message.unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
    });

    PlatformError::from_code(code, message)
}
