use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An analysis report joined with the candidate and job it was produced for.
/// The joined columns are null once the referenced row has been deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReportListing {
    pub id: i64,
    pub candidate_id: Option<i64>,
    pub job_id: Option<i64>,
    /// Assessment JSON exactly as it was stored at creation time.
    pub analysis_result: String,
    pub pdf_filename: Option<String>,
    pub created_at: NaiveDateTime,
    pub candidate_name: Option<String>,
    pub reference_code: Option<String>,
    pub job_title: Option<String>,
    pub tag: Option<String>,
    #[sqlx(skip)]
    #[serde(default)]
    pub overall_score: Option<f64>,
}

impl ReportListing {
    /// Reads `overall_score` back out of the stored assessment JSON.
    pub fn stored_score(&self) -> Option<f64> {
        serde_json::from_str::<serde_json::Value>(&self.analysis_result)
            .ok()?
            .get("overall_score")?
            .as_f64()
    }

    pub fn with_score(mut self) -> Self {
        self.overall_score = self.stored_score();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(analysis_result: &str) -> ReportListing {
        ReportListing {
            id: 1,
            candidate_id: Some(1),
            job_id: None,
            analysis_result: analysis_result.to_string(),
            pdf_filename: None,
            created_at: chrono::Utc::now().naive_utc(),
            candidate_name: None,
            reference_code: None,
            job_title: None,
            tag: None,
            overall_score: None,
        }
    }

    #[test]
    fn test_stored_score_reads_number() {
        let report = listing(r#"{"overall_score": 72, "summary": "ok"}"#).with_score();
        assert_eq!(report.overall_score, Some(72.0));
    }

    #[test]
    fn test_stored_score_missing_or_malformed() {
        assert_eq!(listing(r#"{"summary": "ok"}"#).stored_score(), None);
        assert_eq!(listing("not json").stored_score(), None);
        assert_eq!(listing(r#"{"overall_score": "high"}"#).stored_score(), None);
    }
}
