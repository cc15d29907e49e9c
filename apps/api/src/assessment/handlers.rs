//! Axum route handler for the assessment trigger.

use std::path::Path as FsPath;

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{de, Deserialize, Deserializer, Serialize};
use tracing::{error, info};

use crate::assessment::schema::Assessment;
use crate::assessment::scoring::JobContext;
use crate::auth::AuthUser;
use crate::candidates::queries as candidate_queries;
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind};
use crate::jobs::queries as job_queries;
use crate::reports::queries::{self as report_queries, NewReport};
use crate::reports::render::render_report_html;
use crate::routes::ApiJson;
use crate::state::AppState;
use crate::storage::FileStore;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(deserialize_with = "required_id")]
    pub candidate_id: i64,
    /// Absent, null or blank selects the generic job.
    #[serde(default, deserialize_with = "optional_id")]
    pub job_id: Option<i64>,
}

/// Ids arrive as JSON numbers or, from form selects, as numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_id<E: de::Error>(self) -> Result<Option<i64>, E> {
        match self {
            RawId::Number(id) => Ok(Some(id)),
            RawId::Text(text) if text.trim().is_empty() => Ok(None),
            RawId::Text(text) => text
                .trim()
                .parse()
                .map(Some)
                .map_err(|_| E::custom(format!("invalid id '{text}'"))),
        }
    }
}

fn required_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    RawId::deserialize(deserializer)?
        .into_id::<D::Error>()?
        .ok_or_else(|| de::Error::custom("id cannot be empty"))
}

fn optional_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<RawId>::deserialize(deserializer)? {
        Some(raw) => raw.into_id(),
        None => Ok(None),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis_id: i64,
    pub pdf_filename: String,
    pub analysis_data: Assessment,
    pub message: String,
}

/// POST /api/hr/analyze
///
/// Re-extracts the candidate's CV, scores it against the job (or the generic
/// job when none is given), renders the PDF and stores the report. Nothing is
/// persisted unless every step succeeds.
pub async fn handle_analyze(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(req): ApiJson<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let candidate = candidate_queries::get_candidate(&state.db, req.candidate_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {} not found", req.candidate_id)))?;

    let job = match req.job_id {
        Some(job_id) => {
            let row = job_queries::get_job(&state.db, job_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Job {job_id} not found")))?;
            JobContext::from(&row)
        }
        None => JobContext::generic(),
    };

    let cv_path = FsPath::new(&candidate.cv_file_path);
    let kind = DocumentKind::from_path(cv_path).unwrap_or(DocumentKind::PlainText);
    let candidate_name = candidate.name.as_deref().unwrap_or("Unnamed Candidate");
    let cv_text = extract_text(cv_path, kind, candidate_name).await;

    let assessment = state.fit_scorer.assess(&cv_text, &job).await?;

    let html = render_report_html(&assessment, candidate_name, &job.title, Utc::now().naive_utc());
    let pdf = state.renderer.render_pdf(&html).await?;

    let pdf_filename = FileStore::new_report_filename();
    let pdf_path = state.files.save_report(&pdf_filename, &pdf).await?;

    let analysis_json = serde_json::to_string(&assessment)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize assessment: {e}")))?;

    let inserted = report_queries::insert_report(
        &state.db,
        NewReport {
            candidate_id: candidate.id,
            job_id: req.job_id,
            analysis_json: &analysis_json,
            pdf_filename: &pdf_filename,
        },
    )
    .await;

    let analysis_id = match inserted {
        Ok(id) => id,
        Err(e) => {
            if let Err(cleanup) = state.files.remove(&pdf_path).await {
                error!("Failed to remove orphaned report {}: {cleanup}", pdf_path.display());
            }
            return Err(e.into());
        }
    };

    info!(
        "Report {analysis_id} for candidate {} ({}) against '{}' scored {} (requested by {} #{})",
        candidate.id,
        candidate.reference_code,
        job.title,
        assessment.overall_score,
        auth.email,
        auth.id
    );

    Ok(Json(AnalyzeResponse {
        success: true,
        analysis_id,
        pdf_filename,
        analysis_data: assessment,
        message: "CV analysis completed".to_string(),
    }))
}
