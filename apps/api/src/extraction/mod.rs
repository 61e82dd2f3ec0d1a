//! Text Extractor: turns an uploaded document into cleaned plain text.
//!
//! PDFs go through `pdf-extract` on a blocking thread; plain-text uploads
//! must be UTF-8. Size and emptiness are checked before any parsing.

pub mod clean;
pub mod handlers;
pub mod sections;

use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

pub use clean::clean_text;
pub use sections::{build_resume_document, has_contact_details};

const PDF_MAGIC: &[u8] = b"%PDF-";
const TEXT_EXTENSIONS: &[&str] = &[".txt", ".text", ".md", ".markdown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtractedDocument {
    pub text: String,
    pub format: DocumentFormat,
    pub byte_len: usize,
}

#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("document is empty")]
    Empty,

    #[error("document is {size} bytes; the limit is {limit} bytes")]
    TooLarge { size: usize, limit: usize },

    #[error("unsupported document type: {0}")]
    Unsupported(String),

    #[error("file is not a valid PDF")]
    NotPdf,

    #[error("PDF could not be read: {0}")]
    Pdf(String),

    #[error("text file is not valid UTF-8")]
    Encoding,

    #[error("no readable text found in document")]
    NoText,
}

impl From<ExtractionFailure> for AppError {
    fn from(failure: ExtractionFailure) -> Self {
        match failure {
            ExtractionFailure::Empty => AppError::Input(failure.to_string()),
            ExtractionFailure::TooLarge { .. } => AppError::PayloadTooLarge(failure.to_string()),
            other => AppError::Extraction(other.to_string()),
        }
    }
}

/// Validates and extracts an uploaded document.
pub async fn extract_text(
    bytes: Bytes,
    file_name: Option<&str>,
    content_type: Option<&str>,
    max_bytes: usize,
) -> Result<ExtractedDocument, ExtractionFailure> {
    if bytes.is_empty() {
        return Err(ExtractionFailure::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(ExtractionFailure::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    let byte_len = bytes.len();
    let format = detect_format(&bytes, file_name, content_type)?;
    debug!("Extracting {byte_len} byte document as {format:?}");

    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(bytes).await?,
        DocumentFormat::PlainText => String::from_utf8(bytes.to_vec())
            .map_err(|_| ExtractionFailure::Encoding)?,
    };

    let text = clean_text(&raw);
    if text.is_empty() {
        return Err(ExtractionFailure::NoText);
    }

    Ok(ExtractedDocument {
        text,
        format,
        byte_len,
    })
}

fn detect_format(
    bytes: &[u8],
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<DocumentFormat, ExtractionFailure> {
    if bytes.starts_with(PDF_MAGIC) {
        return Ok(DocumentFormat::Pdf);
    }

    let name = file_name.map(str::to_lowercase).unwrap_or_default();
    let mime = content_type.map(str::to_lowercase).unwrap_or_default();

    if name.ends_with(".pdf") || mime == "application/pdf" {
        return Err(ExtractionFailure::NotPdf);
    }

    let texty_name = TEXT_EXTENSIONS.iter().any(|ext| name.ends_with(ext));
    let texty_mime = mime.starts_with("text/");
    let unlabeled = name.is_empty() && (mime.is_empty() || mime == "application/octet-stream");

    if texty_name || texty_mime || unlabeled {
        Ok(DocumentFormat::PlainText)
    } else {
        let described = if name.is_empty() { mime } else { name };
        Err(ExtractionFailure::Unsupported(described))
    }
}

async fn extract_pdf(bytes: Bytes) -> Result<String, ExtractionFailure> {
    // pdf-extract is synchronous and panics on some malformed files; the
    // blocking task turns a panic into a JoinError.
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionFailure::Pdf(format!("parser aborted: {e}")))?
        .map_err(|e| ExtractionFailure::Pdf(e.to_string()))
}
