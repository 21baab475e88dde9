//! Session entity - a mentoring session logged by a student.

use super::enums::VerificationStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Session {
    pub session_id: i64,
    pub student_id: i64,
    pub session_date: NaiveDate,
    pub duration_minutes: i64,
    pub topic: String,
    pub notes: Option<String>,
    pub status: VerificationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
