//! Shared fixtures for unit and router tests.

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tempfile::TempDir;

use crate::assessment::schema::tests::sample_assessment;
use crate::assessment::schema::Assessment;
use crate::assessment::scoring::{FitScorer, JobContext};
use crate::config::Config;
use crate::db::{init_schema, seed_admin};
use crate::errors::AppError;
use crate::reports::render::ReportRenderer;
use crate::state::AppState;
use crate::storage::FileStore;

pub const ADMIN_EMAIL: &str = "admin@ik.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const JWT_SECRET: &str = "test-secret";
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n% test report\n";

/// Single-connection in-memory database. The connection is never recycled,
/// so the database lives as long as the pool.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap()
}

pub async fn schema_pool() -> SqlitePool {
    let pool = memory_pool().await;
    init_schema(&pool).await.unwrap();
    pool
}

/// Returns a fixed assessment with the given score, or fails when `score` is `None`.
pub struct FakeScorer {
    pub score: Option<f64>,
}

#[async_trait]
impl FitScorer for FakeScorer {
    async fn assess(&self, _cv_text: &str, _job: &JobContext) -> Result<Assessment, AppError> {
        match self.score {
            Some(score) => sample_assessment(score).validate(),
            None => Err(AppError::Llm("model unavailable".to_string())),
        }
    }
}

/// Scores like `FakeScorer` and keeps every CV text it was handed.
#[derive(Default)]
pub struct RecordingScorer {
    pub seen_cv_text: Mutex<Vec<String>>,
}

#[async_trait]
impl FitScorer for RecordingScorer {
    async fn assess(&self, cv_text: &str, _job: &JobContext) -> Result<Assessment, AppError> {
        self.seen_cv_text.lock().unwrap().push(cv_text.to_string());
        sample_assessment(50.0).validate()
    }
}

pub struct FakeRenderer;

#[async_trait]
impl ReportRenderer for FakeRenderer {
    async fn render_pdf(&self, html: &str) -> Result<Vec<u8>, AppError> {
        assert!(html.starts_with("<!DOCTYPE html>"));
        Ok(FAKE_PDF.to_vec())
    }
}

/// App state over a fresh schema, temp storage and the seeded admin account.
/// Keep the `TempDir` alive for the duration of the test.
pub async fn test_state(score: Option<f64>) -> (AppState, TempDir) {
    test_state_with_scorer(Arc::new(FakeScorer { score })).await
}

pub async fn test_state_with_scorer(fit_scorer: Arc<dyn FitScorer>) -> (AppState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = schema_pool().await;
    seed_admin(&db, ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        openai_api_key: String::new(),
        jwt_secret: JWT_SECRET.to_string(),
        upload_dir: dir.path().join("cvs"),
        reports_dir: dir.path().join("reports"),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        port: 0,
    };

    let state = AppState {
        db,
        files: FileStore::new(&config.upload_dir, &config.reports_dir),
        config,
        fit_scorer,
        renderer: Arc::new(FakeRenderer),
    };
    (state, dir)
}
