//! Upload relay routes

use std::any::Any;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State, rejection::JsonRejection},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::Value;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::{
    auth::BearerToken,
    error::{ApiError, ApiResult},
    models::{HealthResponse, ServiceInfo, UploadRequest, UploadResponse},
    platform::VideoMedia,
    state::AppState,
};

/// Create the router for the upload relay
pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit_bytes;

    Router::new()
        .route("/", get(service_info).fallback(not_found))
        .route("/health", get(health_check).fallback(not_found))
        .route("/upload", post(upload_video).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Service description endpoint
pub async fn service_info() -> impl IntoResponse {
    Json(ServiceInfo::default())
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        uptime: state.uptime_seconds(),
        environment: state.config.environment.to_string(),
        port: state.config.port,
    })
}

/// Relay a local video file to the platform
pub async fn upload_video(
    State(state): State<AppState>,
    BearerToken(access_token): BearerToken,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let Json(payload) = payload.map_err(|rejection| {
        warn!("Rejected upload body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(state.config.body_limit_bytes)
        } else {
            ApiError::InvalidBody(rejection.body_text())
        }
    })?;

    let upload = UploadRequest::from_json(payload)?;

    let media = VideoMedia::open(&upload.file_path).await.map_err(|e| {
        warn!(file_path = %upload.file_path, "Cannot open video file: {}", e);
        ApiError::FileNotFound(upload.file_path.clone())
    })?;

    info!(
        title = %upload.resource.snippet.title,
        file_path = %upload.file_path,
        bytes = media.len,
        privacy = ?upload.resource.status.privacy_status,
        "Starting upload"
    );

    let video = state
        .platform
        .insert_video(&access_token, &upload.resource, media)
        .await
        .map_err(|e| {
            error!(kind = e.kind(), file_path = %upload.file_path, "Upload failed: {}", e);
            ApiError::platform(e, state.config.environment.is_development())
        })?;

    info!(video_id = %video.id, file_path = %upload.file_path, "Upload finished");

    Ok(Json(UploadResponse::from(video)))
}

/// Fallback for unknown paths and unsupported methods
pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::RouteNotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %detail, "Handler panicked");
    ApiError::InternalServerError.into_response()
}
