use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub requirements: String,
    pub location: Option<String>,
    pub department: Option<String>,
    pub experience_level: Option<String>,
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
    pub created_at: NaiveDateTime,
}
