//! services/api/src/web/upload.rs
//!
//! The screenshot upload endpoint. The file is relayed to the external image
//! host; only the resulting public URL comes back to the client.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub url: String,
}

/// Upload a screenshot and get its hosted URL.
#[utoipa::path(
    post,
    path = "/upload",
    request_body(content_type = "multipart/form-data", description = "The image to upload."),
    responses(
        (status = 200, description = "Uploaded", body = UploadResponse),
        (status = 400, description = "No file provided"),
        (status = 401, description = "No session"),
        (status = 500, description = "The image host rejected the upload")
    )
)]
pub async fn upload_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })?
    else {
        return Err((StatusCode::BAD_REQUEST, "No file provided".to_string()));
    };

    let file_name = field.file_name().unwrap_or("screenshot.png").to_string();
    let data: Bytes = field.bytes().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read file bytes: {}", e),
        )
    })?;

    let url = state
        .uploader
        .upload_image(&file_name, data.to_vec())
        .await
        .map_err(|e| {
            error!("Screenshot upload failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upload failed".to_string(),
            )
        })?;

    Ok(Json(UploadResponse { url }))
}
