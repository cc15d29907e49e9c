//! Strict contract for the assessment object returned by the scoring backend.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

/// Structured result of comparing a CV against a job.
///
/// List fields may be omitted by the model and default to empty; every scalar
/// field is required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub overall_score: f64,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub partial_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub experience_level: ExperienceLevel,
    pub education_match: bool,
    #[serde(default)]
    pub language_skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    pub recommendation: String,
    #[serde(default)]
    pub ats_feedback: Vec<String>,
    pub summary: String,
}

impl Assessment {
    /// Rejects assessments whose values fall outside the contract.
    pub fn validate(self) -> Result<Self, AppError> {
        if !self.overall_score.is_finite() || !(0.0..=100.0).contains(&self.overall_score) {
            return Err(AppError::Llm(format!(
                "overall_score {} is outside 0-100",
                self.overall_score
            )));
        }
        Ok(self)
    }
}
