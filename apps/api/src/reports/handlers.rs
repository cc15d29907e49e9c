//! Axum route handlers for stored analysis reports.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    Json,
};
use tracing::{debug, info};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::report::ReportListing;
use crate::reports::filters::{ReportFilter, ReportQuery};
use crate::reports::queries;
use crate::reports::render::download_filename;
use crate::routes::{file_download, AckResponse};
use crate::state::AppState;

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Report {id} not found"))
}

/// GET /api/hr/reports?search=&tags=&scores=
pub async fn handle_list_reports(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<ReportListing>>, AppError> {
    let filter = ReportFilter::from_query(&query)?;
    let reports: Vec<ReportListing> = queries::list_reports(&state.db)
        .await?
        .into_iter()
        .filter(|report| filter.matches(report))
        .collect();

    debug!("Report listing returned {} rows for {query:?}", reports.len());
    Ok(Json(reports))
}

/// GET /api/hr/reports/:id
pub async fn handle_get_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ReportListing>, AppError> {
    queries::get_report(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// GET /api/hr/reports/:id/download
pub async fn handle_download_report(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let report = queries::get_report(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    let stored = report
        .pdf_filename
        .as_deref()
        .ok_or_else(|| AppError::NotFound(format!("Report {id} has no PDF")))?;

    let data = match tokio::fs::read(state.files.report_path(stored)).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("PDF for report {id} not found")));
        }
        Err(e) => return Err(e.into()),
    };

    let filename = download_filename(
        report.candidate_name.as_deref(),
        report.job_title.as_deref(),
    );
    Ok(file_download(data, "application/pdf", &filename))
}

/// DELETE /api/hr/reports/:id
///
/// Deletes the row, then the PDF. A PDF that is already gone is not an error.
pub async fn handle_delete_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<AckResponse>, AppError> {
    let report = queries::get_report(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !queries::delete_report(&state.db, id).await? {
        return Err(not_found(id));
    }
    if let Some(filename) = report.pdf_filename.as_deref() {
        state.files.remove(&state.files.report_path(filename)).await?;
    }

    info!("Report {id} deleted by {}", auth.email);
    Ok(AckResponse::ok("Report deleted successfully"))
}
