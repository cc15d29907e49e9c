use sqlx::SqlitePool;

use crate::models::report::ReportListing;

const LISTING_SELECT: &str = r#"
    SELECT ar.id, ar.candidate_id, ar.job_id, ar.analysis_result, ar.pdf_filename, ar.created_at,
           c.name AS candidate_name, c.reference_code, j.title AS job_title, c.tag
    FROM analysis_reports ar
    LEFT JOIN candidates c ON ar.candidate_id = c.id
    LEFT JOIN jobs j ON ar.job_id = j.id
"#;

pub struct NewReport<'a> {
    pub candidate_id: i64,
    pub job_id: Option<i64>,
    pub analysis_json: &'a str,
    pub pdf_filename: &'a str,
}

pub async fn insert_report(pool: &SqlitePool, report: NewReport<'_>) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO analysis_reports (candidate_id, job_id, analysis_result, pdf_filename) VALUES (?, ?, ?, ?)",
    )
    .bind(report.candidate_id)
    .bind(report.job_id)
    .bind(report.analysis_json)
    .bind(report.pdf_filename)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// All reports, newest first, with the stored score read back out.
pub async fn list_reports(pool: &SqlitePool) -> Result<Vec<ReportListing>, sqlx::Error> {
    let rows = sqlx::query_as::<_, ReportListing>(&format!(
        "{LISTING_SELECT} ORDER BY ar.created_at DESC, ar.id DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(ReportListing::with_score).collect())
}

pub async fn get_report(pool: &SqlitePool, id: i64) -> Result<Option<ReportListing>, sqlx::Error> {
    let row = sqlx::query_as::<_, ReportListing>(&format!("{LISTING_SELECT} WHERE ar.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(ReportListing::with_score))
}

pub async fn delete_report(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM analysis_reports WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::queries::{delete_candidate, tests::insert as insert_candidate};
    use crate::jobs::queries::{create_job, delete_job, tests::job_input};
    use crate::test_support::schema_pool;

    #[tokio::test]
    async fn test_listing_joins_candidate_and_job() {
        let pool = schema_pool().await;
        let candidate_id = insert_candidate(&pool, "Jane Doe").await;
        let job_id = create_job(&pool, &job_input("Backend Engineer", "Rust"))
            .await
            .unwrap();

        let id = insert_report(
            &pool,
            NewReport {
                candidate_id,
                job_id: Some(job_id),
                analysis_json: r#"{"overall_score": 81}"#,
                pdf_filename: "report-a.pdf",
            },
        )
        .await
        .unwrap();

        let report = get_report(&pool, id).await.unwrap().unwrap();
        assert_eq!(report.candidate_name.as_deref(), Some("Jane Doe"));
        assert_eq!(report.job_title.as_deref(), Some("Backend Engineer"));
        assert_eq!(report.tag.as_deref(), Some("Pending"));
        assert_eq!(report.overall_score, Some(81.0));
        assert_eq!(report.pdf_filename.as_deref(), Some("report-a.pdf"));
    }

    #[tokio::test]
    async fn test_deleting_referenced_rows_nulls_report_references() {
        let pool = schema_pool().await;
        let candidate_id = insert_candidate(&pool, "Jane Doe").await;
        let job_id = create_job(&pool, &job_input("Backend Engineer", "Rust"))
            .await
            .unwrap();
        let id = insert_report(
            &pool,
            NewReport {
                candidate_id,
                job_id: Some(job_id),
                analysis_json: r#"{"overall_score": 50}"#,
                pdf_filename: "report-b.pdf",
            },
        )
        .await
        .unwrap();

        assert!(delete_candidate(&pool, candidate_id).await.unwrap());
        assert!(delete_job(&pool, job_id).await.unwrap());

        let report = get_report(&pool, id).await.unwrap().unwrap();
        assert_eq!(report.candidate_id, None);
        assert_eq!(report.job_id, None);
        assert_eq!(report.candidate_name, None);
        assert_eq!(report.tag, None);
        assert_eq!(report.overall_score, Some(50.0));
    }

    #[tokio::test]
    async fn test_report_for_unknown_candidate_is_rejected() {
        let pool = schema_pool().await;
        let result = insert_report(
            &pool,
            NewReport {
                candidate_id: 404,
                job_id: None,
                analysis_json: "{}",
                pdf_filename: "report-c.pdf",
            },
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_report() {
        let pool = schema_pool().await;
        let candidate_id = insert_candidate(&pool, "Jane").await;
        let id = insert_report(
            &pool,
            NewReport {
                candidate_id,
                job_id: None,
                analysis_json: "{}",
                pdf_filename: "report-d.pdf",
            },
        )
        .await
        .unwrap();

        assert!(delete_report(&pool, id).await.unwrap());
        assert!(get_report(&pool, id).await.unwrap().is_none());
        assert!(!delete_report(&pool, id).await.unwrap());
    }
}
