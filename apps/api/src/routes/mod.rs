pub mod health;

use axum::{
    extract::{DefaultBodyLimit, FromRequest},
    http::{
        header::{CONTENT_DISPOSITION, CONTENT_TYPE},
        StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;

use crate::assessment::handlers as assessment;
use crate::auth::handlers as auth;
use crate::candidates::handlers as candidates;
use crate::candidates::intake::MAX_UPLOAD_BYTES;
use crate::errors::AppError;
use crate::jobs::handlers as jobs;
use crate::reports::handlers as reports;
use crate::state::AppState;

/// Headroom over the file limit for multipart boundaries and headers.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES + 64 * 1024;

/// JSON request body whose rejections surface as `AppError::Validation`.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `{success, message}` acknowledgement shared by update and delete routes.
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

impl AckResponse {
    pub fn ok(message: &str) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.to_string(),
        })
    }
}

/// Raw file response with an attachment disposition.
/// The filename is reduced to a header-safe ASCII form.
pub fn file_download(data: Vec<u8>, media_type: &str, filename: &str) -> Response {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, media_type.to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{safe}\"")),
        ],
        data,
    )
        .into_response()
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Public intake
        .route(
            "/api/cv/upload",
            post(candidates::handle_upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // HR session
        .route("/api/hr/login", post(auth::handle_login))
        // Jobs
        .route(
            "/api/hr/jobs",
            get(jobs::handle_list_jobs).post(jobs::handle_create_job),
        )
        .route(
            "/api/hr/jobs/:id",
            get(jobs::handle_get_job)
                .put(jobs::handle_update_job)
                .delete(jobs::handle_delete_job),
        )
        // Candidates
        .route("/api/hr/candidates", get(candidates::handle_list_candidates))
        .route(
            "/api/hr/candidates/:id",
            get(candidates::handle_get_candidate)
                .put(candidates::handle_update_candidate)
                .delete(candidates::handle_delete_candidate),
        )
        .route(
            "/api/hr/candidates/:id/tag",
            put(candidates::handle_update_tag),
        )
        .route(
            "/api/hr/candidates/:id/download",
            get(candidates::handle_download_cv),
        )
        // Assessment + reports
        .route("/api/hr/analyze", post(assessment::handle_analyze))
        .route("/api/hr/reports", get(reports::handle_list_reports))
        .route(
            "/api/hr/reports/:id",
            get(reports::handle_get_report).delete(reports::handle_delete_report),
        )
        .route(
            "/api/hr/reports/:id/download",
            get(reports::handle_download_report),
        )
        .with_state(state)
}
