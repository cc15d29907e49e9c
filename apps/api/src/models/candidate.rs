use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Workflow label attached to a candidate. Stored as its display string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum CandidateTag {
    #[default]
    #[serde(rename = "Pending")]
    #[sqlx(rename = "Pending")]
    Pending,
    #[serde(rename = "First Interview")]
    #[sqlx(rename = "First Interview")]
    FirstInterview,
    #[serde(rename = "Not Suitable")]
    #[sqlx(rename = "Not Suitable")]
    NotSuitable,
    #[serde(rename = "On Hold")]
    #[sqlx(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Approved")]
    #[sqlx(rename = "Approved")]
    Approved,
}

impl CandidateTag {
    pub const ALL: [CandidateTag; 5] = [
        CandidateTag::Pending,
        CandidateTag::FirstInterview,
        CandidateTag::NotSuitable,
        CandidateTag::OnHold,
        CandidateTag::Approved,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateTag::Pending => "Pending",
            CandidateTag::FirstInterview => "First Interview",
            CandidateTag::NotSuitable => "Not Suitable",
            CandidateTag::OnHold => "On Hold",
            CandidateTag::Approved => "Approved",
        }
    }
}

impl fmt::Display for CandidateTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allowed: Vec<&str> = CandidateTag::ALL.iter().map(|t| t.as_str()).collect();
        write!(
            f,
            "unknown tag '{}' (expected one of: {})",
            self.0,
            allowed.join(", ")
        )
    }
}

impl FromStr for CandidateTag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CandidateTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateRow {
    pub id: i64,
    pub reference_code: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub cv_file_path: String,
    pub cv_text: Option<String>,
    pub uploaded_at: NaiveDateTime,
    pub tag: CandidateTag,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_parses_every_display_label() {
        for tag in CandidateTag::ALL {
            assert_eq!(tag.as_str().parse::<CandidateTag>(), Ok(tag));
        }
    }

    #[test]
    fn test_tag_rejects_unknown_label() {
        let err = "Hired".parse::<CandidateTag>().unwrap_err();
        assert_eq!(err.0, "Hired");
        assert!(err.to_string().contains("First Interview"));
    }

    #[test]
    fn test_tag_serde_uses_display_label() {
        let json = serde_json::to_string(&CandidateTag::OnHold).unwrap();
        assert_eq!(json, "\"On Hold\"");
        let back: CandidateTag = serde_json::from_str("\"Not Suitable\"").unwrap();
        assert_eq!(back, CandidateTag::NotSuitable);
    }

    #[test]
    fn test_default_tag_is_pending() {
        assert_eq!(CandidateTag::default(), CandidateTag::Pending);
    }
}
