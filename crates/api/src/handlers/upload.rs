//! Handler for `/upload`: storing a file under the media root.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Where an uploaded file ended up.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    /// Absolute public URL.
    pub url: String,
    /// Path relative to the media root, with a leading `/`.
    pub path: String,
    pub filename: String,
}

/// POST /api/v1/upload
///
/// Accepts a multipart form with a required `file` field and an optional
/// `target_path` field. Without a target a dated, random name is generated.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<UploadResponse>)> {
    let mut file_data: Option<(Option<String>, Vec<u8>)> = None;
    let mut target_path: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            "target_path" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                target_path = Some(text);
            }
            _ => {}
        }
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let target = state.uploads.resolve(
        target_path.as_deref().filter(|t| !t.is_empty()),
        filename.as_deref(),
        chrono::Utc::now(),
    )?;

    if let Some(parent) = target.full_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(format!("Failed to create directory: {e}")))?;
    }
    tokio::fs::write(&target.full_path, &data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    tracing::info!(path = %target.relative, bytes = data.len(), "Stored upload");
    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            success: true,
            url: state.uploads.public_url(&target),
            path: format!("/{}", target.relative),
            filename: target.file_name().to_string(),
        }),
    ))
}
