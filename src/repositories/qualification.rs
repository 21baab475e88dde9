//! QualificationRepository - database operations for qualifications.

use super::{Delete, Read, Update};
use crate::dtos::{CreateQualificationDTO, UpdateQualificationDTO};
use crate::entities::{Qualification, VerificationStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const QUALIFICATION_COLUMNS: &str = "qualification_id, student_id, title, issuer, awarded_on, \
                                     status, verified_by, verified_at, created_at, updated_at";

pub struct QualificationRepository {
    connection_pool: SqlitePool,
}

impl QualificationRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts a qualification owned by `student_id`, starting as pending.
    pub async fn create(
        &self,
        student_id: &i64,
        data: &CreateQualificationDTO,
    ) -> Result<Qualification, Error> {
        let now = Utc::now();
        let qualification = sqlx::query_as::<_, Qualification>(&format!(
            "INSERT INTO qualifications (student_id, title, issuer, awarded_on, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {QUALIFICATION_COLUMNS}"
        ))
        .bind(student_id)
        .bind(&data.title)
        .bind(&data.issuer)
        .bind(data.awarded_on)
        .bind(VerificationStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(qualification)
    }

    pub async fn find_many_by_student(
        &self,
        student_id: &i64,
    ) -> Result<Vec<Qualification>, Error> {
        let qualifications = sqlx::query_as::<_, Qualification>(&format!(
            "SELECT {QUALIFICATION_COLUMNS} FROM qualifications
             WHERE student_id = ?
             ORDER BY awarded_on DESC, qualification_id DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(qualifications)
    }

    pub async fn set_status(
        &self,
        id: &i64,
        status: VerificationStatus,
        verified_by: Option<i64>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Qualification, Error> {
        let qualification = sqlx::query_as::<_, Qualification>(&format!(
            "UPDATE qualifications
             SET status = ?, verified_by = ?, verified_at = ?, updated_at = ?
             WHERE qualification_id = ?
             RETURNING {QUALIFICATION_COLUMNS}"
        ))
        .bind(status)
        .bind(verified_by)
        .bind(verified_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(qualification)
    }
}

impl Read<Qualification, i64> for QualificationRepository {
    async fn read(&self, id: &i64) -> Result<Option<Qualification>, Error> {
        let qualification = sqlx::query_as::<_, Qualification>(&format!(
            "SELECT {QUALIFICATION_COLUMNS} FROM qualifications WHERE qualification_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(qualification)
    }
}

impl Update<Qualification, UpdateQualificationDTO, i64> for QualificationRepository {
    async fn update(
        &self,
        id: &i64,
        data: &UpdateQualificationDTO,
    ) -> Result<Qualification, Error> {
        let qualification = sqlx::query_as::<_, Qualification>(&format!(
            "UPDATE qualifications
             SET title = COALESCE(?, title),
                 issuer = COALESCE(?, issuer),
                 awarded_on = COALESCE(?, awarded_on),
                 updated_at = ?
             WHERE qualification_id = ?
             RETURNING {QUALIFICATION_COLUMNS}"
        ))
        .bind(&data.title)
        .bind(&data.issuer)
        .bind(data.awarded_on)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(qualification)
    }
}

impl Delete<i64> for QualificationRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM qualifications WHERE qualification_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
