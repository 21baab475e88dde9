//! ActivityRepository - database operations for logged activities.

use super::{Delete, Read, Update};
use crate::dtos::{CreateActivityDTO, UpdateActivityDTO};
use crate::entities::{Activity, VerificationStatus};
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const ACTIVITY_COLUMNS: &str = "activity_id, student_id, title, description, activity_date, \
                                hours, status, verified_by, verified_at, created_at, updated_at";

pub struct ActivityRepository {
    connection_pool: SqlitePool,
}

impl ActivityRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts an activity owned by `student_id`. New records always start as
    /// pending with no verifier.
    pub async fn create(
        &self,
        student_id: &i64,
        data: &CreateActivityDTO,
    ) -> Result<Activity, Error> {
        let now = Utc::now();
        let activity = sqlx::query_as::<_, Activity>(&format!(
            "INSERT INTO activities (student_id, title, description, activity_date, hours, status, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(student_id)
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.activity_date)
        .bind(data.hours)
        .bind(VerificationStatus::Pending)
        .bind(now)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(activity)
    }

    pub async fn find_many_by_student(&self, student_id: &i64) -> Result<Vec<Activity>, Error> {
        let activities = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities
             WHERE student_id = ?
             ORDER BY activity_date DESC, activity_id DESC"
        ))
        .bind(student_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(activities)
    }

    /// Stamps the verification decision. Setting a record back to pending
    /// clears the verifier columns, so callers pass `None` for both.
    pub async fn set_status(
        &self,
        id: &i64,
        status: VerificationStatus,
        verified_by: Option<i64>,
        verified_at: Option<DateTime<Utc>>,
    ) -> Result<Activity, Error> {
        let activity = sqlx::query_as::<_, Activity>(&format!(
            "UPDATE activities
             SET status = ?, verified_by = ?, verified_at = ?, updated_at = ?
             WHERE activity_id = ?
             RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(status)
        .bind(verified_by)
        .bind(verified_at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(activity)
    }
}

impl Read<Activity, i64> for ActivityRepository {
    async fn read(&self, id: &i64) -> Result<Option<Activity>, Error> {
        let activity = sqlx::query_as::<_, Activity>(&format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activities WHERE activity_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(activity)
    }
}

impl Update<Activity, UpdateActivityDTO, i64> for ActivityRepository {
    async fn update(&self, id: &i64, data: &UpdateActivityDTO) -> Result<Activity, Error> {
        let activity = sqlx::query_as::<_, Activity>(&format!(
            "UPDATE activities
             SET title = COALESCE(?, title),
                 description = COALESCE(?, description),
                 activity_date = COALESCE(?, activity_date),
                 hours = COALESCE(?, hours),
                 updated_at = ?
             WHERE activity_id = ?
             RETURNING {ACTIVITY_COLUMNS}"
        ))
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.activity_date)
        .bind(data.hours)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(activity)
    }
}

impl Delete<i64> for ActivityRepository {
    async fn delete(&self, id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM activities WHERE activity_id = ?")
            .bind(id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "assignments", "records")))]
    async fn test_set_status_stamps_verifier(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ActivityRepository::new(pool);

        let now = Utc::now();
        let verified = repo
            .set_status(&1, VerificationStatus::Verified, Some(2), Some(now))
            .await?;
        assert_eq!(verified.status, VerificationStatus::Verified);
        assert_eq!(verified.verified_by, Some(2));
        assert_eq!(verified.verified_at, Some(now));

        let reset = repo
            .set_status(&1, VerificationStatus::Pending, None, None)
            .await?;
        assert_eq!(reset.status, VerificationStatus::Pending);
        assert!(reset.verified_by.is_none());
        assert!(reset.verified_at.is_none());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users", "assignments", "records")))]
    async fn test_find_many_by_student_scopes_to_owner(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = ActivityRepository::new(pool);

        let saras = repo.find_many_by_student(&4).await?;
        assert_eq!(saras.len(), 2);
        assert!(saras.iter().all(|a| a.student_id == 4));

        let simons = repo.find_many_by_student(&5).await?;
        assert_eq!(simons.len(), 1);

        Ok(())
    }
}
