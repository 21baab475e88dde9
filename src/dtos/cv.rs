//! CV DTOs.
//!
//! CV creation arrives as multipart/form-data, so `CreateCvDTO` is assembled
//! by the upload handler after the file has been written to disk rather than
//! deserialized from a JSON body.

use crate::entities::{StudentCv, VerificationStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CvDTO {
    pub cv_id: i64,
    pub student_id: i64,
    pub label: String,
    pub file_path: String,
    pub status: VerificationStatus,
    pub verified_by: Option<i64>,
    pub verified_at: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
}

impl From<StudentCv> for CvDTO {
    fn from(value: StudentCv) -> Self {
        Self {
            cv_id: value.cv_id,
            student_id: value.student_id,
            label: value.label,
            file_path: value.file_path,
            status: value.status,
            verified_by: value.verified_by,
            verified_at: value.verified_at,
            uploaded_at: value.uploaded_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateCvDTO {
    pub student_id: i64,

    #[validate(length(min = 1, max = 100, message = "Label must be between 1 and 100 characters"))]
    pub label: String,

    pub file_path: String,
}
