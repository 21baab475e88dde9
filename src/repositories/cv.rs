//! CvRepository - database operations for uploaded CV documents.
//!
//! The repository only tracks metadata rows; the files themselves live under
//! the configured upload directory and are managed by the CV service.

use super::{Delete, Read};
use crate::dtos::CreateCvDTO;
use crate::entities::{StudentCv, VerificationStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const CV_COLUMNS: &str =
    "cv_id, student_id, label, file_path, status, verified_by, verified_at, uploaded_at";

pub struct CvRepository {
    connection_pool: SqlitePool,
}

impl CvRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    pub async fn create(&self, data: &CreateCvDTO) -> Result<StudentCv, Error> {
        let cv = sqlx::query_as::<_, StudentCv>(&format!(
            "INSERT INTO cvs (student_id, label, file_path, status, uploaded_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING {CV_COLUMNS}"
        ))
        .bind(data.student_id)
        .bind(&data.label)
        .bind(&data.file_path)
        .bind(VerificationStatus::Pending)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(cv)
    }

    pub async fn find_many_by_student(&self, student_id: &i64) -> Result<Vec<StudentCv>, Error> {
        let cvs = sqlx::query_as::<_, StudentCv>(&format!(
            "SELECT {CV_COLUMNS} FROM cvs
             WHERE student_id = ?
             ORDER BY uploaded_at DESC, cv_id DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(cvs)
    }

    pub async fn set_status(
        &self,
        id: &i64,
        status: VerificationStatus,
        verified_by: Option<i64>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<StudentCv, Error> {
        let cv = sqlx::query_as::<_, StudentCv>(&format!(
            "UPDATE cvs
             SET status = ?, verified_by = ?, verified_at = ?
             WHERE cv_id = ?
             RETURNING {CV_COLUMNS}"
        ))
        .bind(status)
        .bind(verified_by)
        .bind(verified_at)
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(cv)
    }
}

impl Read<StudentCv, i64> for CvRepository {
    async fn read(&self, id: &i64) -> Result<Option<StudentCv>, Error> {
        let cv = sqlx::query_as::<_, StudentCv>(&format!(
            "SELECT {CV_COLUMNS} FROM cvs WHERE cv_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(cv)
    }
}

impl Delete<i64> for CvRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM cvs WHERE cv_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}
