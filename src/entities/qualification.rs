//! Qualification entity - an awarded qualification owned by one student.

use super::enums::VerificationStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Qualification {
    pub qualification_id: i64,
    pub student_id: i64,
    pub title: String,
    pub issuer: String,
    pub awarded_on: NaiveDate,
    pub status: VerificationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
