use sqlx::SqlitePool;
use tracing::warn;

use crate::candidates::intake::generate_reference_code;
use crate::models::candidate::{CandidateRow, CandidateTag};

/// Attempts before giving up on finding a free reference code.
const REFERENCE_CODE_ATTEMPTS: usize = 5;

pub struct NewCandidate<'a> {
    pub name: &'a str,
    pub cv_file_path: &'a str,
    pub cv_text: &'a str,
}

/// Inserts a candidate under a fresh reference code, drawing a new code if the
/// UNIQUE constraint rejects one. Returns `(id, reference_code)`.
pub async fn insert_candidate(
    pool: &SqlitePool,
    candidate: NewCandidate<'_>,
) -> Result<(i64, String), sqlx::Error> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let reference_code = generate_reference_code();
        let result = sqlx::query(
            "INSERT INTO candidates (reference_code, name, cv_file_path, cv_text) VALUES (?, ?, ?, ?)",
        )
        .bind(&reference_code)
        .bind(candidate.name)
        .bind(candidate.cv_file_path)
        .bind(candidate.cv_text)
        .execute(pool)
        .await;

        match result {
            Ok(done) => return Ok((done.last_insert_rowid(), reference_code)),
            Err(sqlx::Error::Database(e))
                if e.is_unique_violation() && attempt < REFERENCE_CODE_ATTEMPTS =>
            {
                warn!("Reference code {reference_code} already taken, drawing another");
            }
            Err(e) => return Err(e),
        }
    }
}

pub async fn list_candidates(pool: &SqlitePool) -> Result<Vec<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates ORDER BY uploaded_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_candidate(pool: &SqlitePool, id: i64) -> Result<Option<CandidateRow>, sqlx::Error> {
    sqlx::query_as::<_, CandidateRow>("SELECT * FROM candidates WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Sets the name; tag and notes are only changed when given.
pub async fn update_candidate(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    tag: Option<CandidateTag>,
    notes: Option<&str>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE candidates SET name = ?, tag = COALESCE(?, tag), notes = COALESCE(?, notes) WHERE id = ?",
    )
    .bind(name)
    .bind(tag)
    .bind(notes)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_tag(pool: &SqlitePool, id: i64, tag: CandidateTag) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE candidates SET tag = ? WHERE id = ?")
        .bind(tag)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_candidate(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM candidates WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
