//! HTTP handler for multipart file uploads (listing photos and
//! application documents)

use std::path::{Path as StdPath, PathBuf};

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::AppState;
use shared::UploadCategory;

const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub path: String,
    pub original_filename: String,
    pub size_bytes: usize,
}

/// Store one uploaded file under the configured upload directory.
///
/// The stored name is a fresh UUID plus the original extension, so
/// uploads never collide and client-chosen names never reach the disk.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(category): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let category = UploadCategory::parse(&category).ok_or_else(|| AppError::Validation {
        field: "category".to_string(),
        message: format!("unknown upload category {category}"),
    })?;

    let field = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation {
            field: "file".to_string(),
            message: format!("invalid multipart payload: {e}"),
        })?
        .ok_or_else(|| AppError::Validation {
            field: "file".to_string(),
            message: "no file field in upload".to_string(),
        })?;

    let original_filename = field.file_name().unwrap_or("upload").to_string();
    let extension = StdPath::new(&original_filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
        .unwrap_or_default();

    let bytes = field.bytes().await.map_err(|e| AppError::Validation {
        field: "file".to_string(),
        message: format!("failed to read upload: {e}"),
    })?;
    if bytes.is_empty() {
        return Err(AppError::Validation {
            field: "file".to_string(),
            message: "uploaded file is empty".to_string(),
        });
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation {
            field: "file".to_string(),
            message: format!("file exceeds the {MAX_UPLOAD_BYTES} byte limit"),
        });
    }

    let stored_name = format!("{}{extension}", Uuid::new_v4());
    let dir: PathBuf = [
        state.config.storage.upload_dir.as_str(),
        category.as_str(),
    ]
    .iter()
    .collect();

    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::StorageError(format!("failed to create upload dir: {e}")))?;

    let target = dir.join(&stored_name);
    tokio::fs::write(&target, &bytes)
        .await
        .map_err(|e| AppError::StorageError(format!("failed to store upload: {e}")))?;

    tracing::info!(
        category = category.as_str(),
        stored = %target.display(),
        size = bytes.len(),
        "file uploaded"
    );

    Ok(Json(UploadResponse {
        path: format!("/{}/{}", category.as_str(), stored_name),
        original_filename,
        size_bytes: bytes.len(),
    }))
}
