use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

const BCRYPT_COST: u32 = 10;

/// Creates and returns a SQLite connection pool, creating the database file if needed.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database {database_url}...");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS hr_users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS jobs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        requirements TEXT NOT NULL,
        location TEXT,
        department TEXT,
        experience_level TEXT,
        employment_type TEXT,
        salary_range TEXT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS candidates (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        reference_code TEXT UNIQUE NOT NULL,
        name TEXT,
        email TEXT,
        phone TEXT,
        cv_file_path TEXT NOT NULL,
        cv_text TEXT,
        uploaded_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
        tag TEXT NOT NULL DEFAULT 'Pending',
        notes TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS analysis_reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        candidate_id INTEGER REFERENCES candidates (id) ON DELETE SET NULL,
        job_id INTEGER REFERENCES jobs (id) ON DELETE SET NULL,
        analysis_result TEXT NOT NULL,
        pdf_filename TEXT,
        created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
    )
    "#,
];

/// Creates the four application tables if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

/// Seeds the HR account used to log into the admin panel.
/// Existing accounts with the same email are left untouched.
pub async fn seed_admin(pool: &SqlitePool, email: &str, password: &str) -> Result<()> {
    let password = password.to_string();
    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, BCRYPT_COST))
        .await
        .context("Password hashing task panicked")?
        .context("Failed to hash seed password")?;

    let result = sqlx::query("INSERT OR IGNORE INTO hr_users (email, password_hash) VALUES (?, ?)")
        .bind(email)
        .bind(&hash)
        .execute(pool)
        .await?;

    if result.rows_affected() > 0 {
        info!("Seeded HR account {email}");
    }
    Ok(())
}
