//! AssignmentRepository - database operations for mentor/student pairings.

use super::{Create, Delete, Read};
use crate::dtos::CreateAssignmentDTO;
use crate::entities::Assignment;
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const ASSIGNMENT_COLUMNS: &str = "assignment_id, mentor_id, student_id, assigned_at, notes";

pub struct AssignmentRepository {
    connection_pool: SqlitePool,
}

impl AssignmentRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// The pairing for a specific mentor and student, if one exists.
    pub async fn find_by_pair(
        &self,
        mentor_id: &i64,
        student_id: &i64,
    ) -> Result<Option<Assignment>, Error> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE mentor_id = ? AND student_id = ?"
        ))
        .bind(mentor_id)
        .bind(student_id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(assignment)
    }

    /// Whether an assignment pairs these two users, in either orientation.
    /// Used by the messaging rule, where the caller may be on either side.
    pub async fn linked(&self, user_a: &i64, user_b: &i64) -> Result<bool, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM assignments
             WHERE (mentor_id = ? AND student_id = ?)
                OR (mentor_id = ? AND student_id = ?)",
        )
        .bind(user_a)
        .bind(user_b)
        .bind(user_b)
        .bind(user_a)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count > 0)
    }

    pub async fn find_many_by_mentor(&self, mentor_id: &i64) -> Result<Vec<Assignment>, Error> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE mentor_id = ? ORDER BY assigned_at ASC"
        ))
        .bind(mentor_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(assignments)
    }

    pub async fn find_many_by_student(&self, student_id: &i64) -> Result<Vec<Assignment>, Error> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments
             WHERE student_id = ? ORDER BY assigned_at ASC"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(assignments)
    }

    pub async fn list_all(&self) -> Result<Vec<Assignment>, Error> {
        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments ORDER BY assigned_at ASC"
        ))
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(assignments)
    }
}

impl Create<Assignment, CreateAssignmentDTO> for AssignmentRepository {
    /// Inserts a pairing. The UNIQUE (mentor_id, student_id) constraint turns
    /// duplicate pairings into a unique-violation error.
    async fn create(&self, data: &CreateAssignmentDTO) -> Result<Assignment, Error> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "INSERT INTO assignments (mentor_id, student_id, assigned_at, notes)
             VALUES (?, ?, ?, ?)
             RETURNING {ASSIGNMENT_COLUMNS}"
        ))
        .bind(data.mentor_id)
        .bind(data.student_id)
        .bind(Utc::now())
        .bind(&data.notes)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(assignment)
    }
}

impl Read<Assignment, i64> for AssignmentRepository {
    async fn read(&self, id: &i64) -> Result<Option<Assignment>, Error> {
        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE assignment_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(assignment)
    }
}

impl Delete<i64> for AssignmentRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM assignments WHERE assignment_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
