use std::sync::Arc;

use sqlx::SqlitePool;

use crate::assessment::scoring::FitScorer;
use crate::config::Config;
use crate::reports::render::ReportRenderer;
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    pub files: FileStore,
    /// Pluggable fit scorer. Default: LlmFitScorer.
    pub fit_scorer: Arc<dyn FitScorer>,
    /// Pluggable HTML → PDF backend. Default: ChromeReportRenderer.
    pub renderer: Arc<dyn ReportRenderer>,
}
