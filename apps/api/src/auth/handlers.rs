use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::{issue_token, Claims};
use crate::errors::AppError;
use crate::models::hr_user::{HrUser, HrUserRow};
use crate::routes::ApiJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: HrUser,
}

/// POST /api/hr/login
pub async fn handle_login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let user = sqlx::query_as::<_, HrUserRow>(
        "SELECT id, email, password_hash FROM hr_users WHERE email = ?",
    )
    .bind(req.email.trim())
    .fetch_optional(&state.db)
    .await?;

    let Some(user) = user else {
        warn!("Login attempt for unknown account");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    };

    let hash = user.password_hash.clone();
    let password = req.password;
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password check aborted: {e}")))?
        .unwrap_or(false);

    if !valid {
        warn!("Invalid password for {}", user.email);
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issue_token(&Claims::new(user.id, &user.email), &state.config.jwt_secret)?;
    info!("HR user {} logged in", user.email);

    Ok(Json(LoginResponse {
        token,
        user: HrUser::from(&user),
    }))
}
