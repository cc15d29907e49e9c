//! Document extractor: turns a stored CV file into plain text.
//!
//! Extraction never fails from the caller's point of view. Any parser or I/O
//! error, or an empty result, degrades to a fallback line naming the file.

mod docx;

use std::path::Path;

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

pub use docx::extract_docx_text;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const TEXT_MEDIA_TYPE: &str = "text/plain";

/// The three document formats accepted for CV upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
}

impl DocumentKind {
    /// Resolves a declared media type, ignoring parameters such as `; charset=utf-8`.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let essence = media_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            PDF_MEDIA_TYPE => Some(DocumentKind::Pdf),
            DOCX_MEDIA_TYPE => Some(DocumentKind::Docx),
            TEXT_MEDIA_TYPE => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    /// Resolves a stored file by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|v| v.to_str())
            .map(|v| v.to_ascii_lowercase())?;
        match extension.as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::PlainText),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::PlainText => "txt",
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => PDF_MEDIA_TYPE,
            DocumentKind::Docx => DOCX_MEDIA_TYPE,
            DocumentKind::PlainText => TEXT_MEDIA_TYPE,
        }
    }
}

/// Text used in place of the CV when nothing could be extracted.
pub fn fallback_text(original_name: &str) -> String {
    format!("Text could not be extracted - file name: {original_name}")
}

/// Extracts plain text from the file at `path`. Always returns non-empty text.
pub async fn extract_text(path: &Path, kind: DocumentKind, original_name: &str) -> String {
    match try_extract(path, kind).await {
        Ok(text) if !text.trim().is_empty() => {
            debug!(
                "Extracted {} chars from {} ({kind:?})",
                text.len(),
                path.display()
            );
            text
        }
        Ok(_) => {
            warn!(
                "No text extracted from {}; using file name as fallback",
                path.display()
            );
            fallback_text(original_name)
        }
        Err(e) => {
            warn!("Text extraction failed for {}: {e:#}", path.display());
            fallback_text(original_name)
        }
    }
}

async fn try_extract(path: &Path, kind: DocumentKind) -> Result<String> {
    let data = tokio::fs::read(path).await?;
    if data.is_empty() {
        return Ok(String::new());
    }

    tokio::task::spawn_blocking(move || extract_from_bytes(&data, kind))
        .await
        .map_err(|e| anyhow!("extraction task aborted: {e}"))?
}

/// Synchronous extraction over in-memory bytes. Parsers are CPU-bound.
pub fn extract_from_bytes(data: &[u8], kind: DocumentKind) -> Result<String> {
    match kind {
        DocumentKind::Pdf => Ok(pdf_extract::extract_text_from_mem(data)?),
        DocumentKind::Docx => extract_docx_text(data),
        DocumentKind::PlainText => Ok(String::from_utf8_lossy(data).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_resolution() {
        assert_eq!(
            DocumentKind::from_media_type("application/pdf"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_media_type(DOCX_MEDIA_TYPE),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_media_type("text/plain; charset=utf-8"),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_media_type("image/png"), None);
        assert_eq!(DocumentKind::from_media_type("application/msword"), None);
    }

    #[test]
    fn test_path_resolution_is_case_insensitive() {
        assert_eq!(
            DocumentKind::from_path(Path::new("uploads/cvs/cv-1.PDF")),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("cv.docx")),
            Some(DocumentKind::Docx)
        );
        assert_eq!(
            DocumentKind::from_path(Path::new("cv.txt")),
            Some(DocumentKind::PlainText)
        );
        assert_eq!(DocumentKind::from_path(Path::new("cv")), None);
    }

    #[tokio::test]
    async fn test_plain_text_is_returned_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        tokio::fs::write(&path, "Jane Doe\nRust, SQL").await.unwrap();

        let text = extract_text(&path, DocumentKind::PlainText, "jane.txt").await;
        assert_eq!(text, "Jane Doe\nRust, SQL");
    }

    #[tokio::test]
    async fn test_docx_file_is_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        let data = docx::tests::docx_with_body("<w:p><w:r><w:t>Kubernetes</w:t></w:r></w:p>");
        tokio::fs::write(&path, data).await.unwrap();

        let text = extract_text(&path, DocumentKind::Docx, "cv.docx").await;
        assert_eq!(text, "Kubernetes");
    }

    #[tokio::test]
    async fn test_empty_file_falls_back_to_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        tokio::fs::write(&path, "   \n").await.unwrap();

        let text = extract_text(&path, DocumentKind::PlainText, "John_Smith.txt").await;
        assert_eq!(text, fallback_text("John_Smith.txt"));
    }

    #[tokio::test]
    async fn test_corrupt_pdf_falls_back_to_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.pdf");
        tokio::fs::write(&path, b"definitely not a pdf").await.unwrap();

        let text = extract_text(&path, DocumentKind::Pdf, "broken.pdf").await;
        assert_eq!(text, fallback_text("broken.pdf"));
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_name() {
        let text = extract_text(
            Path::new("/nonexistent/cv.docx"),
            DocumentKind::Docx,
            "ghost.docx",
        )
        .await;
        assert!(text.contains("ghost.docx"));
    }

    #[tokio::test]
    async fn test_docx_inflating_past_limit_falls_back_to_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.docx");
        let paragraph = format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", "a".repeat(64 * 1024));
        let copies = (docx::MAX_DOCUMENT_XML_BYTES as usize / paragraph.len()) + 1;
        let data = docx::tests::docx_with_body(&paragraph.repeat(copies));
        assert!((data.len() as u64) < docx::MAX_DOCUMENT_XML_BYTES / 100);
        tokio::fs::write(&path, data).await.unwrap();

        let text = extract_text(&path, DocumentKind::Docx, "bomb.docx").await;
        assert_eq!(text, fallback_text("bomb.docx"));
    }
}
