//! Loose-file storage for uploaded CVs and generated PDF reports.
//!
//! Directories are created lazily on first write. Paths handed back to callers
//! are what gets persisted in the store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FileStore {
    upload_dir: PathBuf,
    reports_dir: PathBuf,
}

impl FileStore {
    pub fn new(upload_dir: impl Into<PathBuf>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            reports_dir: reports_dir.into(),
        }
    }

    /// Writes an uploaded CV under a fresh `cv-<uuid>.<ext>` name and returns its path.
    pub async fn save_cv(&self, extension: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let path = self
            .upload_dir
            .join(format!("cv-{}.{extension}", Uuid::new_v4()));
        tokio::fs::write(&path, data).await?;
        debug!("Stored CV at {}", path.display());
        Ok(path)
    }

    /// Generates the file key for a new report. Keys never depend on names or clocks.
    pub fn new_report_filename() -> String {
        format!("report-{}.pdf", Uuid::new_v4())
    }

    pub fn report_path(&self, filename: &str) -> PathBuf {
        self.reports_dir.join(filename)
    }

    pub async fn save_report(&self, filename: &str, pdf: &[u8]) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.reports_dir).await?;
        let path = self.report_path(filename);
        tokio::fs::write(&path, pdf).await?;
        debug!("Stored report at {}", path.display());
        Ok(path)
    }

    /// Removes a stored file. A file that is already gone is not an error.
    pub async fn remove(&self, path: &Path) -> std::io::Result<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("File {} was already missing on delete", path.display());
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_cv_creates_directory_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("a/cvs"), dir.path().join("a/reports"));

        let path = store.save_cv("pdf", b"%PDF-1.4").await.unwrap();
        assert!(path.starts_with(dir.path().join("a/cvs")));
        assert_eq!(path.extension().unwrap(), "pdf");
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_remove_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("cvs"), dir.path().join("reports"));

        let path = store.save_report("r.pdf", b"pdf").await.unwrap();
        store.remove(&path).await.unwrap();
        assert!(!path.exists());
        store.remove(&path).await.unwrap();
    }

    #[test]
    fn test_report_filenames_are_unique() {
        let a = FileStore::new_report_filename();
        let b = FileStore::new_report_filename();
        assert_ne!(a, b);
        assert!(a.starts_with("report-") && a.ends_with(".pdf"));
    }
}
