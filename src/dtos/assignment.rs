//! Assignment DTOs.

use crate::entities::Assignment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssignmentDTO {
    pub assignment_id: i64,
    pub mentor_id: i64,
    pub student_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl From<Assignment> for AssignmentDTO {
    fn from(value: Assignment) -> Self {
        Self {
            assignment_id: value.assignment_id,
            mentor_id: value.mentor_id,
            student_id: value.student_id,
            assigned_at: value.assigned_at,
            notes: value.notes,
        }
    }
}

/// DTO for pairing a mentor with a student (admin only).
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateAssignmentDTO {
    pub mentor_id: i64,
    pub student_id: i64,

    #[validate(length(max = 1000, message = "Notes must be at most 1000 characters"))]
    pub notes: Option<String>,
}
