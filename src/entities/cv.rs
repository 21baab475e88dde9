//! CV entity - an uploaded CV file owned by one student.
//!
//! The file itself lives under the configured upload directory; only the
//! relative path is persisted.

use super::enums::VerificationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct StudentCv {
    pub cv_id: i64,
    pub student_id: i64,
    pub label: String,
    pub file_path: String,
    pub status: VerificationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}
