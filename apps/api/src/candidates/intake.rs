//! CV intake helpers: upload limits, reference codes and display names.

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use chrono::{Datelike, Utc};
use rand::Rng;

use crate::errors::AppError;
use crate::extraction::DocumentKind;

/// Largest CV accepted by the upload endpoint.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field that carries the CV.
pub const CV_FIELD: &str = "cv";

#[derive(Debug)]
pub struct UploadedCv {
    pub original_name: String,
    pub kind: DocumentKind,
    pub data: Bytes,
}

/// Reads the single `cv` file out of a multipart body, enforcing type and size.
pub async fn read_cv_upload(multipart: &mut Multipart) -> Result<UploadedCv, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(CV_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("cv").to_string();
        let media_type = field.content_type().unwrap_or_default().to_string();
        let kind = DocumentKind::from_media_type(&media_type).ok_or_else(|| {
            AppError::UnsupportedMediaType(format!(
                "Only PDF, DOCX and TXT files are allowed (got '{media_type}')"
            ))
        })?;

        let data = field.bytes().await.map_err(multipart_error)?;
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::PayloadTooLarge(format!(
                "CV exceeds the {} MB limit",
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }
        if data.is_empty() {
            return Err(AppError::Validation("CV file is empty".to_string()));
        }

        return Ok(UploadedCv {
            original_name,
            kind,
            data,
        });
    }

    Err(AppError::Validation("CV file is required".to_string()))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
    }
}

/// `CND-<year>-<6 digits>`.
pub fn generate_reference_code() -> String {
    let number: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format_reference_code(Utc::now().year(), number)
}

fn format_reference_code(year: i32, number: u32) -> String {
    format!("CND-{year}-{number:06}")
}

#[cfg(test)]
pub fn is_reference_code(code: &str) -> bool {
    let mut parts = code.split('-');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some("CND"), Some(year), Some(digits), None)
            if year.len() == 4
                && year.bytes().all(|b| b.is_ascii_digit())
                && digits.len() == 6
                && digits.bytes().all(|b| b.is_ascii_digit())
    )
}

/// Display name from an uploaded file name: extension dropped, `_` and `-` become spaces.
pub fn derive_candidate_name(file_name: &str) -> String {
    let base = std::path::Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    let stem = match base.rfind('.') {
        Some(idx) if idx > 0 => &base[..idx],
        _ => base,
    };
    let name = stem
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() {
        "Unnamed Candidate".to_string()
    } else {
        name
    }
}
