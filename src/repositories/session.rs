//! SessionRepository - database operations for mentorship sessions.

use super::{Delete, Read, Update};
use crate::dtos::{CreateSessionDTO, UpdateSessionDTO};
use crate::entities::{Session, VerificationStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const SESSION_COLUMNS: &str = "session_id, student_id, session_date, duration_minutes, topic, \
                               notes, status, verified_by, verified_at, created_at, updated_at";

pub struct SessionRepository {
    connection_pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts a session owned by `student_id`, starting as pending.
    pub async fn create(
        &self,
        student_id: &i64,
        data: &CreateSessionDTO,
    ) -> Result<Session, Error> {
        let now = Utc::now();
        let session = sqlx::query_as::<_, Session>(&format!(
            "INSERT INTO sessions (student_id, session_date, duration_minutes, topic, notes, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(student_id)
        .bind(data.session_date)
        .bind(data.duration_minutes)
        .bind(&data.topic)
        .bind(&data.notes)
        .bind(VerificationStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(session)
    }

    pub async fn find_many_by_student(&self, student_id: &i64) -> Result<Vec<Session>, Error> {
        let sessions = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions
             WHERE student_id = ?
             ORDER BY session_date DESC, session_id DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(sessions)
    }

    pub async fn set_status(
        &self,
        id: &i64,
        status: VerificationStatus,
        verified_by: Option<i64>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Session, Error> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "UPDATE sessions
             SET status = ?, verified_by = ?, verified_at = ?, updated_at = ?
             WHERE session_id = ?
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(status)
        .bind(verified_by)
        .bind(verified_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(session)
    }
}

impl Read<Session, i64> for SessionRepository {
    async fn read(&self, id: &i64) -> Result<Option<Session>, Error> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "SELECT {SESSION_COLUMNS} FROM sessions WHERE session_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(session)
    }
}

impl Update<Session, UpdateSessionDTO, i64> for SessionRepository {
    async fn update(&self, id: &i64, data: &UpdateSessionDTO) -> Result<Session, Error> {
        let session = sqlx::query_as::<_, Session>(&format!(
            "UPDATE sessions
             SET session_date = COALESCE(?, session_date),
                 duration_minutes = COALESCE(?, duration_minutes),
                 topic = COALESCE(?, topic),
                 notes = COALESCE(?, notes),
                 updated_at = ?
             WHERE session_id = ?
             RETURNING {SESSION_COLUMNS}"
        ))
        .bind(data.session_date)
        .bind(data.duration_minutes)
        .bind(&data.topic)
        .bind(&data.notes)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(session)
    }
}

impl Delete<i64> for SessionRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM sessions WHERE session_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
