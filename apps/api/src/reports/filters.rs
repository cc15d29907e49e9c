//! Report listing filters: free-text search, tag membership and score ranges.
//!
//! All filters combine with AND. An absent or blank filter matches everything.

use serde::Deserialize;

use crate::errors::AppError;
use crate::models::report::ReportListing;

/// Raw query string of `GET /api/hr/reports`.
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub search: Option<String>,
    /// Comma-separated tag labels.
    pub tags: Option<String>,
    /// Comma-separated `min-max` pairs.
    pub scores: Option<String>,
}

/// Inclusive score range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

impl ScoreRange {
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        let invalid = || AppError::Validation(format!("invalid score range '{raw}', expected min-max"));

        let (min, max) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let min: f64 = min.trim().parse().map_err(|_| invalid())?;
        let max: f64 = max.trim().parse().map_err(|_| invalid())?;
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(invalid());
        }
        Ok(Self { min, max })
    }

    pub fn contains(&self, score: f64) -> bool {
        self.min <= score && score <= self.max
    }
}

#[derive(Debug, Default)]
pub struct ReportFilter {
    search: Option<String>,
    tags: Vec<String>,
    score_ranges: Vec<ScoreRange>,
}

impl ReportFilter {
    pub fn from_query(query: &ReportQuery) -> Result<Self, AppError> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let tags = split_list(query.tags.as_deref())
            .map(str::to_string)
            .collect();

        let score_ranges = split_list(query.scores.as_deref())
            .map(ScoreRange::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            search,
            tags,
            score_ranges,
        })
    }

    pub fn matches(&self, report: &ReportListing) -> bool {
        self.matches_search(report) && self.matches_tags(report) && self.matches_score(report)
    }

    fn matches_search(&self, report: &ReportListing) -> bool {
        let Some(needle) = &self.search else {
            return true;
        };
        [
            &report.candidate_name,
            &report.reference_code,
            &report.job_title,
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle.as_str()))
    }

    fn matches_tags(&self, report: &ReportListing) -> bool {
        if self.tags.is_empty() {
            return true;
        }
        report
            .tag
            .as_deref()
            .is_some_and(|tag| self.tags.iter().any(|t| t == tag))
    }

    fn matches_score(&self, report: &ReportListing) -> bool {
        if self.score_ranges.is_empty() {
            return true;
        }
        report
            .overall_score
            .is_some_and(|score| self.score_ranges.iter().any(|r| r.contains(score)))
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(name: &str, code: &str, job: Option<&str>, tag: &str, score: f64) -> ReportListing {
        ReportListing {
            id: 1,
            candidate_id: Some(1),
            job_id: Some(1),
            analysis_result: format!(r#"{{"overall_score": {score}}}"#),
            pdf_filename: Some("report.pdf".to_string()),
            created_at: Utc::now().naive_utc(),
            candidate_name: Some(name.to_string()),
            reference_code: Some(code.to_string()),
            job_title: job.map(str::to_string),
            tag: Some(tag.to_string()),
            overall_score: Some(score),
        }
    }

    fn filter(search: Option<&str>, tags: Option<&str>, scores: Option<&str>) -> ReportFilter {
        ReportFilter::from_query(&ReportQuery {
            search: search.map(str::to_string),
            tags: tags.map(str::to_string),
            scores: scores.map(str::to_string),
        })
        .unwrap()
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let r = report("Jane", "CND-2026-000001", None, "Pending", 10.0);
        assert!(filter(None, None, None).matches(&r));
        assert!(filter(Some("  "), Some(" , "), Some("")).matches(&r));
    }

    #[test]
    fn test_search_is_case_insensitive_over_three_fields() {
        let r = report(
            "Şule Yılmaz",
            "CND-2026-123456",
            Some("Backend Engineer"),
            "Pending",
            70.0,
        );
        assert!(filter(Some("şULE"), None, None).matches(&r));
        assert!(filter(Some("cnd-2026-1234"), None, None).matches(&r));
        assert!(filter(Some("backend"), None, None).matches(&r));
        assert!(!filter(Some("frontend"), None, None).matches(&r));
    }

    #[test]
    fn test_tag_membership() {
        let r = report("Jane", "CND-2026-000001", None, "On Hold", 10.0);
        assert!(filter(None, Some("Approved,On Hold"), None).matches(&r));
        assert!(!filter(None, Some("Approved"), None).matches(&r));

        let mut orphan = r.clone();
        orphan.tag = None;
        assert!(!filter(None, Some("On Hold"), None).matches(&orphan));
    }

    #[test]
    fn test_score_range_is_inclusive() {
        let f = filter(None, None, Some("60-100"));
        for (score, expected) in [(59.9, false), (60.0, true), (85.0, true), (100.0, true)] {
            let r = report("Jane", "CND-2026-000001", None, "Pending", score);
            assert_eq!(f.matches(&r), expected, "score {score}");
        }
    }

    #[test]
    fn test_multiple_score_ranges_are_ored() {
        let f = filter(None, None, Some("0-20, 80-100"));
        let low = report("A", "CND-2026-000001", None, "Pending", 15.0);
        let mid = report("B", "CND-2026-000002", None, "Pending", 50.0);
        let high = report("C", "CND-2026-000003", None, "Pending", 90.0);
        assert!(f.matches(&low));
        assert!(!f.matches(&mid));
        assert!(f.matches(&high));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let r = report("Jane", "CND-2026-000001", Some("QA"), "Approved", 75.0);
        assert!(filter(Some("jane"), Some("Approved"), Some("60-100")).matches(&r));
        assert!(!filter(Some("jane"), Some("Pending"), Some("60-100")).matches(&r));
        assert!(!filter(Some("jane"), Some("Approved"), Some("0-59")).matches(&r));
    }

    #[test]
    fn test_report_without_score_never_matches_a_range() {
        let mut r = report("Jane", "CND-2026-000001", None, "Pending", 0.0);
        r.overall_score = None;
        assert!(!filter(None, None, Some("0-100")).matches(&r));
    }

    #[test]
    fn test_score_range_parsing() {
        assert_eq!(
            ScoreRange::parse(" 40 - 59 ").unwrap(),
            ScoreRange {
                min: 40.0,
                max: 59.0
            }
        );
        assert!(ScoreRange::parse("60").is_err());
        assert!(ScoreRange::parse("abc-100").is_err());
        assert!(ScoreRange::parse("90-10").is_err());
        assert!(ScoreRange::parse("-").is_err());
    }

    #[test]
    fn test_malformed_scores_reject_whole_query() {
        let result = ReportFilter::from_query(&ReportQuery {
            search: None,
            tags: None,
            scores: Some("60-100,high".to_string()),
        });
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
