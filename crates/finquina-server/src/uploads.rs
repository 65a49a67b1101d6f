//! Photo uploads.
//!
//! `POST /api/upload` takes a multipart form with a `file` field, stores
//! it in the blob store and answers with the public URL. Stored files
//! are served back by the static route mounted at the store's public
//! base (usually `/uploads`).

use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, State};
use finquina_core::actions::uploads::NO_FILE;
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Largest accepted request body, in bytes (10 MiB).
pub const UPLOAD_LIMIT: usize = 10_485_760;

/// Form field carrying the file.
const FILE_FIELD: &str = "file";

/// Response to a successful upload.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always `true`.
    pub success: bool,
    /// Public URL of the stored file.
    pub filepath: String,
    /// Stored file name.
    pub filename: String,
}

/// `POST /api/upload`
pub async fn upload(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or("upload").to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        let blob = state.farm.store_upload(&name, &bytes).await?;
        return Ok(Json(UploadResponse {
            success: true,
            filepath: blob.url,
            filename: blob.filename,
        }));
    }
    Err(ApiError::BadRequest(NO_FILE.to_owned()))
}
