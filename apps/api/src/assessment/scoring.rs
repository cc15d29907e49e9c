//! Fit scoring: pluggable, trait-based scorer that compares CV text with a job.
//!
//! Default: `LlmFitScorer` (prompt-encoded heuristics evaluated by the model).
//! `AppState` holds an `Arc<dyn FitScorer>` so tests can swap in a
//! deterministic backend without touching handlers.

use async_trait::async_trait;
use tracing::info;

use crate::assessment::prompts::build_assessment_prompt;
use crate::assessment::schema::Assessment;
use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::LlmClient;
use crate::models::job::JobRow;

/// The job fields an assessment is scored against.
#[derive(Debug, Clone, PartialEq)]
pub struct JobContext {
    pub title: String,
    pub description: String,
    pub requirements: String,
}

impl JobContext {
    pub const GENERIC_TITLE: &'static str = "General Position";

    /// Synthetic record used when an assessment is requested without a job.
    pub fn generic() -> Self {
        Self {
            title: Self::GENERIC_TITLE.to_string(),
            description: "Evaluation for a general position".to_string(),
            requirements: "General work skills and experience - no specific position was given, \
                           so low scoring applies"
                .to_string(),
        }
    }
}

impl From<&JobRow> for JobContext {
    fn from(job: &JobRow) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
        }
    }
}

/// The fit scorer trait. Implement this to swap backends without touching
/// the endpoint, handler, or caller code.
///
/// Carried in `AppState` as `Arc<dyn FitScorer>`.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn assess(&self, cv_text: &str, job: &JobContext) -> Result<Assessment, AppError>;
}

/// Scores via the language model. The response must parse into `Assessment`
/// and pass validation; there is no repair or retry.
pub struct LlmFitScorer(pub LlmClient);

#[async_trait]
impl FitScorer for LlmFitScorer {
    async fn assess(&self, cv_text: &str, job: &JobContext) -> Result<Assessment, AppError> {
        let prompt = build_assessment_prompt(cv_text, job);
        let assessment: Assessment = self
            .0
            .call_json(&prompt, JSON_ONLY_SYSTEM)
            .await
            .map_err(|e| AppError::Llm(format!("CV assessment failed: {e}")))?;
        let assessment = assessment.validate()?;

        info!(
            "Assessment for '{}' scored {}",
            job.title, assessment.overall_score
        );
        Ok(assessment)
    }
}
