//! UserRepository - database operations for users.

use super::{Create, Delete, Read, Update};
use crate::dtos::{CreateUserDTO, UpdateUserDTO};
use crate::entities::{User, UserRole};
use chrono::Utc;
use sqlx::{Error, SqlitePool};

const USER_COLUMNS: &str = "user_id, email, password, name, role, created_at, updated_at";

pub struct UserRepository {
    connection_pool: SqlitePool,
}

impl UserRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Find a user by exact email match. Emails are unique.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }

    /// List every user, optionally filtered by a name or email prefix.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>, Error> {
        let users = if let Some(search) = search {
            let pattern = format!("{}%", search);
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE name LIKE ? OR email LIKE ?
                 ORDER BY name ASC"
            ))
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&self.connection_pool)
            .await?
        } else {
            sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users ORDER BY name ASC"
            ))
            .fetch_all(&self.connection_pool)
            .await?
        };

        Ok(users)
    }
}

impl Create<User, CreateUserDTO> for UserRepository {
    /// Inserts a user. The caller is expected to have hashed the password and
    /// decided the role beforehand (self-registration forces Student).
    async fn create(&self, data: &CreateUserDTO) -> Result<User, Error> {
        let now = Utc::now();
        let role = data.role.unwrap_or(UserRole::Student);

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (email, password, name, role, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.email)
        .bind(&data.password)
        .bind(&data.name)
        .bind(role)
        .bind(now)
        .bind(now)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Read<User, i64> for UserRepository {
    async fn read(&self, id: &i64) -> Result<Option<User>, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE user_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(user)
    }
}

impl Update<User, UpdateUserDTO, i64> for UserRepository {
    async fn update(&self, id: &i64, data: &UpdateUserDTO) -> Result<User, Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET name = COALESCE(?, name),
                 password = COALESCE(?, password),
                 role = COALESCE(?, role),
                 updated_at = ?
             WHERE user_id = ?
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&data.name)
        .bind(&data.password)
        .bind(data.role)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?
        .ok_or(Error::RowNotFound)?;

        Ok(user)
    }
}

impl Delete<i64> for UserRepository {
    /// Hard delete. Assignments, records and messages referencing the user
    /// are removed by the schema's ON DELETE CASCADE clauses.
    async fn delete(&self, user_id: &i64) -> Result<(), Error> {
        sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.connection_pool)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_find_by_email(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let user = repo.find_by_email("sara@passport.test").await?;
        assert_eq!(user.map(|u| u.user_id), Some(4));

        let missing = repo.find_by_email("nobody@passport.test").await?;
        assert!(missing.is_none());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_list_with_prefix_search(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let all = repo.list(None).await?;
        assert_eq!(all.len(), 6);

        let mentors_named_m = repo.list(Some("M")).await?;
        assert_eq!(mentors_named_m.len(), 2);
        assert!(mentors_named_m.iter().all(|u| u.name.starts_with('M')));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../../fixtures", scripts("users")))]
    async fn test_update_is_partial(pool: SqlitePool) -> sqlx::Result<()> {
        let repo = UserRepository::new(pool);

        let updated = repo
            .update(
                &4,
                &UpdateUserDTO {
                    name: Some("Sara Senior".to_string()),
                    password: None,
                    role: None,
                },
            )
            .await?;

        assert_eq!(updated.name, "Sara Senior");
        assert_eq!(updated.role, UserRole::Student);
        assert_eq!(updated.email, "sara@passport.test");

        Ok(())
    }
}
