//! Axum route handlers for job postings.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::queries::{self, JobInput};
use crate::models::job::JobRow;
use crate::routes::{AckResponse, ApiJson};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct JobCreatedResponse {
    pub id: i64,
    pub message: String,
}

/// GET /api/hr/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<JobRow>>, AppError> {
    Ok(Json(queries::list_jobs(&state.db).await?))
}

/// POST /api/hr/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(input): ApiJson<JobInput>,
) -> Result<Json<JobCreatedResponse>, AppError> {
    input.validate()?;
    let id = queries::create_job(&state.db, &input).await?;
    info!("Job {id} '{}' created by {}", input.title.trim(), auth.email);

    Ok(Json(JobCreatedResponse {
        id,
        message: "Job created successfully".to_string(),
    }))
}

/// GET /api/hr/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<JobRow>, AppError> {
    queries::get_job(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {id} not found")))
}

/// PUT /api/hr/jobs/:id
pub async fn handle_update_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(input): ApiJson<JobInput>,
) -> Result<Json<AckResponse>, AppError> {
    input.validate()?;
    if !queries::update_job(&state.db, id, &input).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!("Job {id} updated by {}", auth.email);
    Ok(AckResponse::ok("Job updated successfully"))
}

/// DELETE /api/hr/jobs/:id
///
/// Reports that referenced the job keep their row with a null job reference.
pub async fn handle_delete_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<AckResponse>, AppError> {
    if !queries::delete_job(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Job {id} not found")));
    }
    info!("Job {id} deleted by {}", auth.email);
    Ok(AckResponse::ok("Job deleted successfully"))
}
