mod assessment;
mod auth;
mod candidates;
mod config;
mod db;
mod errors;
mod extraction;
mod jobs;
mod llm_client;
mod models;
mod reports;
mod routes;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::scoring::LlmFitScorer;
use crate::config::Config;
use crate::db::{create_pool, init_schema, seed_admin};
use crate::llm_client::LlmClient;
use crate::reports::render::ChromeReportRenderer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::FileStore;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize structured logging before config so its warnings are visible
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("{}=info,tower_http=info", env!("CARGO_PKG_NAME")))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    info!("Starting TalentDesk API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite
    let db = create_pool(&config.database_url).await?;
    init_schema(&db).await?;
    seed_admin(&db, &config.admin_email, &config.admin_password).await?;

    // Initialize LLM client + fit scorer
    let llm = LlmClient::new(config.openai_api_key.clone());
    info!("LLM client initialized (model: {})", llm_client::MODEL);
    let fit_scorer = Arc::new(LlmFitScorer(llm));

    let files = FileStore::new(&config.upload_dir, &config.reports_dir);
    info!(
        "Storing CVs in {} and reports in {}",
        config.upload_dir.display(),
        config.reports_dir.display()
    );

    // Build app state
    let state = AppState {
        db,
        config: config.clone(),
        files,
        fit_scorer,
        renderer: Arc::new(ChromeReportRenderer),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
