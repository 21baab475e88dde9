//! Activity DTOs.

use crate::entities::{Activity, VerificationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActivityDTO {
    pub activity_id: i64,
    pub student_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub activity_date: NaiveDate,
    pub hours: f64,
    pub status: VerificationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Activity> for ActivityDTO {
    fn from(value: Activity) -> Self {
        Self {
            activity_id: value.activity_id,
            student_id: value.student_id,
            title: value.title,
            description: value.description,
            activity_date: value.activity_date,
            hours: value.hours,
            status: value.status,
            verified_by: value.verified_by,
            verified_at: value.verified_at,
            created_at: value.created_at,
        }
    }
}

/// DTO for logging a new activity. The owner is the authenticated student and
/// the status always starts as pending, so neither appears here.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateActivityDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub activity_date: NaiveDate,

    #[validate(range(min = 0.0, max = 24.0, message = "Hours must be between 0 and 24"))]
    pub hours: f64,
}

/// DTO for editing a pending activity (partial update).
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateActivityDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    pub activity_date: Option<NaiveDate>,

    #[validate(range(min = 0.0, max = 24.0, message = "Hours must be between 0 and 24"))]
    pub hours: Option<f64>,
}
