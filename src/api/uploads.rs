use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;
use crate::storage::{PresignedUpload, object_key};

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/video", post(presign_video))
        .route("/image", post(presign_image))
        .route("/media-config", get(media_config))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadRequest {
    #[serde(alias = "file_name")]
    file_name: String,
    #[serde(alias = "content_type")]
    content_type: String,
    #[serde(default)]
    folder: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MediaConfigResponse {
    cloud_name: String,
    upload_preset: String,
}

async fn presign_video(
    State(state): State<AppState>,
    req: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<PresignedUpload>, AppError> {
    let Json(req) = req?;
    presign(&state, req, "video/", "videos").await
}

async fn presign_image(
    State(state): State<AppState>,
    req: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<PresignedUpload>, AppError> {
    let Json(req) = req?;
    presign(&state, req, "image/", "images").await
}

async fn presign(
    state: &AppState,
    req: UploadRequest,
    mime_prefix: &str,
    default_folder: &str,
) -> Result<Json<PresignedUpload>, AppError> {
    let signer = state.uploads.as_ref().ok_or(AppError::UploadsDisabled)?;

    if req.file_name.trim().is_empty() {
        return Err(AppError::BadRequest("fileName is required".to_string()));
    }
    if !req.content_type.trim().to_ascii_lowercase().starts_with(mime_prefix) {
        return Err(AppError::BadRequest(format!(
            "contentType must be {}*",
            mime_prefix
        )));
    }

    let folder = req.folder.as_deref().unwrap_or(default_folder);
    let key = object_key(folder, &req.file_name);
    let upload = signer.presign_put(&key).await?;
    info!("issued upload url for {}", upload.key);
    Ok(Json(upload))
}

async fn media_config(State(state): State<AppState>) -> Result<Json<MediaConfigResponse>, AppError> {
    let media = state.media.as_ref().ok_or(AppError::UploadsDisabled)?;
    Ok(Json(MediaConfigResponse {
        cloud_name: media.cloud_name.clone(),
        upload_preset: media.upload_preset.clone(),
    }))
}
