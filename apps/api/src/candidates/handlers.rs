//! Axum route handlers for CV intake and candidate management.

use std::path::Path as FsPath;

use axum::{
    extract::{Multipart, Path, State},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::auth::AuthUser;
use crate::candidates::intake::{derive_candidate_name, read_cv_upload};
use crate::candidates::queries::{self, NewCandidate};
use crate::errors::AppError;
use crate::extraction::{extract_text, DocumentKind};
use crate::models::candidate::{CandidateRow, CandidateTag};
use crate::routes::{file_download, AckResponse, ApiJson};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub reference_code: String,
    pub candidate_name: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCandidateRequest {
    #[serde(default)]
    pub name: String,
    pub tag: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub tag: String,
}

fn parse_tag(raw: &str) -> Result<CandidateTag, AppError> {
    raw.parse::<CandidateTag>()
        .map_err(|e| AppError::Validation(e.to_string()))
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Candidate {id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/cv/upload
///
/// Public intake. Stores the file, extracts its text and registers the candidate
/// under a new reference code.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let upload = read_cv_upload(&mut multipart).await?;

    let path = state
        .files
        .save_cv(upload.kind.extension(), &upload.data)
        .await?;
    let cv_text = extract_text(&path, upload.kind, &upload.original_name).await;
    let candidate_name = derive_candidate_name(&upload.original_name);
    let path_str = path.to_string_lossy();

    let inserted = queries::insert_candidate(
        &state.db,
        NewCandidate {
            name: &candidate_name,
            cv_file_path: &path_str,
            cv_text: &cv_text,
        },
    )
    .await;

    let (id, reference_code) = match inserted {
        Ok(row) => row,
        Err(e) => {
            if let Err(cleanup) = state.files.remove(&path).await {
                error!("Failed to remove orphaned CV {}: {cleanup}", path.display());
            }
            return Err(e.into());
        }
    };

    info!("Candidate {id} registered as {reference_code} ({candidate_name})");

    Ok(Json(UploadResponse {
        success: true,
        reference_code,
        candidate_name,
        message: "CV uploaded successfully".to_string(),
    }))
}

/// GET /api/hr/candidates
pub async fn handle_list_candidates(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> Result<Json<Vec<CandidateRow>>, AppError> {
    Ok(Json(queries::list_candidates(&state.db).await?))
}

/// GET /api/hr/candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<CandidateRow>, AppError> {
    queries::get_candidate(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /api/hr/candidates/:id
pub async fn handle_update_candidate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<UpdateCandidateRequest>,
) -> Result<Json<AckResponse>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }
    let tag = req.tag.as_deref().map(parse_tag).transpose()?;

    if !queries::update_candidate(&state.db, id, name, tag, req.notes.as_deref()).await? {
        return Err(not_found(id));
    }
    info!("Candidate {id} updated by {}", auth.email);
    Ok(AckResponse::ok("Candidate updated successfully"))
}

/// PUT /api/hr/candidates/:id/tag
pub async fn handle_update_tag(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    ApiJson(req): ApiJson<UpdateTagRequest>,
) -> Result<Json<AckResponse>, AppError> {
    let tag = parse_tag(&req.tag)?;
    if !queries::update_tag(&state.db, id, tag).await? {
        return Err(not_found(id));
    }
    info!("Candidate {id} tagged '{tag}' by {}", auth.email);
    Ok(AckResponse::ok("Tag updated successfully"))
}

/// DELETE /api/hr/candidates/:id
///
/// Deletes the row, then the stored CV. Reports survive with a null candidate.
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<AckResponse>, AppError> {
    let candidate = queries::get_candidate(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    if !queries::delete_candidate(&state.db, id).await? {
        return Err(not_found(id));
    }
    state
        .files
        .remove(FsPath::new(&candidate.cv_file_path))
        .await?;

    info!(
        "Candidate {id} ({}) deleted by {}",
        candidate.reference_code, auth.email
    );
    Ok(AckResponse::ok("Candidate deleted successfully"))
}

/// GET /api/hr/candidates/:id/download
pub async fn handle_download_cv(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    let candidate = queries::get_candidate(&state.db, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let path = FsPath::new(&candidate.cv_file_path);
    let data = match tokio::fs::read(path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("CV file for candidate {id} not found")));
        }
        Err(e) => return Err(e.into()),
    };

    let kind = DocumentKind::from_path(path).unwrap_or(DocumentKind::Pdf);
    let display_name = candidate.name.as_deref().unwrap_or("CV");
    let filename = format!("{display_name}.{}", kind.extension());

    Ok(file_download(data, kind.media_type(), &filename))
}
