//! Assignment entity - the mentor/student pairing record.
//!
//! An assignment is what authorizes a mentor to view and verify a student's
//! records and to exchange messages with them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct Assignment {
    pub assignment_id: i64,
    pub mentor_id: i64,
    pub student_id: i64,
    pub assigned_at: DateTime<Utc>,
    pub notes: Option<String>,
}
