//! Axum route handler for resume uploads.

use std::path::{Component, Path, PathBuf};

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::resume::upload::{is_allowed_file, store_upload};
use crate::state::AppState;

const DEFAULT_FORMAT: &str = "json";

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub message: String,
}

/// Fields pulled out of the multipart body.
#[derive(Default)]
struct UploadForm {
    file: Option<(String, Bytes)>,
    format: Option<String>,
    output_folder: Option<String>,
}

/// POST /parse-resume
///
/// Multipart fields: `file` (required), `format` (`json` | `spreadsheet`, default
/// `json`), `output_folder` (optional, empty means the configured folder).
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let form = read_form(multipart).await?;

    let (filename, data) = form
        .file
        .ok_or_else(|| AppError::BadRequest("No file part".to_string()))?;
    if filename.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }
    if !is_allowed_file(&filename) {
        return Err(AppError::BadRequest("File type not allowed".to_string()));
    }

    let output_folder = match form.output_folder.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(requested) => Some(resolve_output_folder(
            &state.config.output_folder,
            requested,
        )?),
    };
    let format = form
        .format
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

    let upload_folder = state.config.upload_folder.clone();
    let span = info_span!("parse_resume", request_id = %Uuid::new_v4(), file = %filename);

    let stored_path =
        tokio::task::spawn_blocking(move || store_upload(&upload_folder, &filename, &data))
            .await
            .map_err(|e| AppError::Internal(e.into()))??;

    let run = async {
        match &output_folder {
            Some(folder) => {
                state
                    .parser
                    .process_into(&stored_path, &format, folder)
                    .await
            }
            None => state.parser.process(&stored_path, &format).await,
        }
    };
    let message = run.instrument(span).await?;

    Ok(Json(ParseResumeResponse { message }))
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Multipart error: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                form.file = Some((filename, data));
            }
            Some("format") => form.format = Some(read_text(field).await?),
            Some("output_folder") => form.output_folder = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {e}")))
}

/// Places a client-chosen output folder under the configured output root.
/// Absolute paths and `..` components are rejected.
fn resolve_output_folder(root: &Path, requested: &str) -> Result<PathBuf, AppError> {
    let requested = Path::new(requested);
    let escapes = requested.components().any(|c| {
        matches!(
            c,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(AppError::BadRequest("Invalid output folder".to_string()));
    }
    Ok(root.join(requested))
}
