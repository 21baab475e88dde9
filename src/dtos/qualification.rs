//! Qualification DTOs.

use crate::entities::{Qualification, VerificationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QualificationDTO {
    pub qualification_id: i64,
    pub student_id: i64,
    pub title: String,
    pub issuer: String,
    pub awarded_on: NaiveDate,
    pub status: VerificationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Qualification> for QualificationDTO {
    fn from(value: Qualification) -> Self {
        Self {
            qualification_id: value.qualification_id,
            student_id: value.student_id,
            title: value.title,
            issuer: value.issuer,
            awarded_on: value.awarded_on,
            status: value.status,
            verified_by: value.verified_by,
            verified_at: value.verified_at,
            created_at: value.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateQualificationDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(min = 1, max = 200, message = "Issuer must be between 1 and 200 characters"))]
    pub issuer: String,

    pub awarded_on: NaiveDate,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateQualificationDTO {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Issuer must be between 1 and 200 characters"))]
    pub issuer: Option<String>,

    pub awarded_on: Option<NaiveDate>,
}
