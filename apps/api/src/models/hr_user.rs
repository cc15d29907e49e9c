use serde::Serialize;
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct HrUserRow {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
}

/// Public view of an HR account; never carries the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct HrUser {
    pub id: i64,
    pub email: String,
}

impl From<&HrUserRow> for HrUser {
    fn from(row: &HrUserRow) -> Self {
        Self {
            id: row.id,
            email: row.email.clone(),
        }
    }
}
