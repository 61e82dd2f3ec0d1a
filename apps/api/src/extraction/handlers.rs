//! Axum route handlers for document extraction.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::{build_resume_document, extract_text, DocumentFormat, ExtractedDocument};
use crate::models::ResumeSections;
use crate::state::AppState;

/// Multipart field names accepted for the uploaded document.
const FILE_FIELDS: &[&str] = &["file", "resume"];

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub format: DocumentFormat,
    pub byte_len: usize,
    pub word_count: usize,
    pub sections_found: usize,
    pub sections: ResumeSections,
    pub text: String,
}

/// Reads the document field of a multipart upload and extracts its text.
pub async fn read_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<ExtractedDocument, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if !field.name().is_some_and(|n| FILE_FIELDS.contains(&n)) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(multipart_error)?;

        let document = extract_text(
            data,
            file_name.as_deref(),
            content_type.as_deref(),
            max_bytes,
        )
        .await?;
        info!(
            "Extracted {:?} upload: {} bytes → {} chars",
            document.format,
            document.byte_len,
            document.text.len()
        );
        return Ok(document);
    }

    Err(AppError::Input(
        "multipart field 'file' is missing".to_string(),
    ))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Input(format!("invalid multipart body: {}", e.body_text()))
    }
}

/// POST /api/v1/documents/extract
///
/// Stateless extraction: returns the cleaned text and the detected sections.
pub async fn handle_extract(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let document = read_upload(&mut multipart, state.config.max_upload_bytes).await?;
    let resume = build_resume_document(&document.text);

    Ok(Json(ExtractResponse {
        format: document.format,
        byte_len: document.byte_len,
        word_count: resume.word_count,
        sections_found: resume.sections.present_count(),
        sections: resume.sections,
        text: resume.raw_text,
    }))
}
