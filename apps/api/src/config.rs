use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::warn;

const DEFAULT_JWT_SECRET: &str = "talentdesk-dev-secret-change-me";

/// Application configuration loaded from environment variables.
/// Every value has a fallback so the service starts with an empty environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub openai_api_key: String,
    pub jwt_secret: String,
    pub upload_dir: PathBuf,
    pub reports_dir: PathBuf,
    pub admin_email: String,
    pub admin_password: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let openai_api_key = env_or("OPENAI_API_KEY", "");
        if openai_api_key.is_empty() {
            warn!("OPENAI_API_KEY is not set; assessment requests will fail");
        }

        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                warn!("JWT_SECRET is not set; falling back to the built-in development secret");
                DEFAULT_JWT_SECRET.to_string()
            }
        };

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://database.sqlite"),
            openai_api_key,
            jwt_secret,
            upload_dir: PathBuf::from(env_or("UPLOAD_DIR", "uploads/cvs")),
            reports_dir: PathBuf::from(env_or("REPORTS_DIR", "uploads/reports")),
            admin_email: env_or("ADMIN_EMAIL", "admin@ik.com"),
            admin_password: env_or("ADMIN_PASSWORD", "admin123"),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
