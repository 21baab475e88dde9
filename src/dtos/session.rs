//! Session DTOs.

use crate::entities::{Session, VerificationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionDTO {
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
}

impl From<Session> for SessionDTO {
    fn from(value: Session) -> Self {
        Self {
            session_id: value.session_id,
            student_id: value.student_id,
            session_date: value.session_date,
            duration_minutes: value.duration_minutes,
            topic: value.topic,
            notes: value.notes,
            status: value.status,
            verified_by: value.verified_by,
            verified_at: value.verified_at,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateSessionDTO {
    pub session_date: NaiveDate,

    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration_minutes: i64,

    #[validate(length(min = 1, max = 200, message = "Topic must be between 1 and 200 characters"))]
    pub topic: String,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateSessionDTO {
    pub session_date: Option<NaiveDate>,

    #[validate(range(min = 1, max = 1440, message = "Duration must be between 1 and 1440 minutes"))]
    pub duration_minutes: Option<i64>,

    #[validate(length(min = 1, max = 200, message = "Topic must be between 1 and 200 characters"))]
    pub topic: Option<String>,

    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}
