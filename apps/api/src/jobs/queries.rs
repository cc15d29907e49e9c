use serde::Deserialize;
use sqlx::SqlitePool;

use crate::errors::AppError;
use crate::models::job::JobRow;

/// Editable fields of a job posting, as sent by the admin panel.
#[derive(Debug, Clone, Deserialize)]
pub struct JobInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub requirements: String,
    pub location: Option<String>,
    pub department: Option<String>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
}

impl JobInput {
    /// Title, description and requirements are required; everything else is free-form.
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("title", &self.title),
            ("description", &self.description),
            ("requirements", &self.requirements),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

pub async fn list_jobs(pool: &SqlitePool) -> Result<Vec<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs ORDER BY created_at DESC, id DESC")
        .fetch_all(pool)
        .await
}

pub async fn get_job(pool: &SqlitePool, id: i64) -> Result<Option<JobRow>, sqlx::Error> {
    sqlx::query_as::<_, JobRow>("SELECT * FROM jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_job(pool: &SqlitePool, input: &JobInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO jobs
            (title, description, requirements, location, department,
             experience_level, employment_type, salary_range)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.title.trim())
    .bind(input.description.trim())
    .bind(input.requirements.trim())
    .bind(&input.location)
    .bind(&input.department)
    .bind(&input.experience_level)
    .bind(&input.employment_type)
    .bind(&input.salary_range)
    .execute(pool)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Replaces every editable field. Returns false when no job has this id.
pub async fn update_job(pool: &SqlitePool, id: i64, input: &JobInput) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE jobs
        SET title = ?, description = ?, requirements = ?, location = ?, department = ?,
            experience_level = ?, employment_type = ?, salary_range = ?
        WHERE id = ?
        "#,
    )
    .bind(input.title.trim())
    .bind(input.description.trim())
    .bind(input.requirements.trim())
    .bind(&input.location)
    .bind(&input.department)
    .bind(&input.experience_level)
    .bind(&input.employment_type)
    .bind(&input.salary_range)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_job(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::schema_pool;

    pub(crate) fn job_input(title: &str, requirements: &str) -> JobInput {
        JobInput {
            title: title.to_string(),
            description: format!("{title} role"),
            requirements: requirements.to_string(),
            location: Some("Istanbul".to_string()),
            department: Some("Engineering".to_string()),
            experience_level: Some("Senior".to_string()),
            employment_type: Some("Full-time".to_string()),
            salary_range: None,
        }
    }

    #[test]
    fn test_validate_requires_core_fields() {
        assert!(job_input("Backend Engineer", "Rust").validate().is_ok());

        let mut missing = job_input("Backend Engineer", "Rust");
        missing.requirements = "   ".to_string();
        let err = missing.validate().unwrap_err();
        assert!(err.to_string().contains("requirements"));
    }

    #[tokio::test]
    async fn test_create_update_delete_round() {
        let pool = schema_pool().await;
        let id = create_job(&pool, &job_input("Backend Engineer", "Rust"))
            .await
            .unwrap();

        let job = get_job(&pool, id).await.unwrap().unwrap();
        assert_eq!(job.title, "Backend Engineer");
        assert_eq!(job.location.as_deref(), Some("Istanbul"));

        let mut edit = job_input("Staff Engineer", "Rust, Go");
        edit.location = None;
        assert!(update_job(&pool, id, &edit).await.unwrap());
        let job = get_job(&pool, id).await.unwrap().unwrap();
        assert_eq!(job.title, "Staff Engineer");
        assert_eq!(job.location, None);

        assert!(delete_job(&pool, id).await.unwrap());
        assert!(get_job(&pool, id).await.unwrap().is_none());
        assert!(!delete_job(&pool, id).await.unwrap());
        assert!(!update_job(&pool, id, &edit).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = schema_pool().await;
        let first = create_job(&pool, &job_input("A", "x")).await.unwrap();
        let second = create_job(&pool, &job_input("B", "y")).await.unwrap();

        let ids: Vec<i64> = list_jobs(&pool).await.unwrap().iter().map(|j| j.id).collect();
        assert_eq!(ids, vec![second, first]);
    }
}
