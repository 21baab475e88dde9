//! User DTOs.

use crate::entities::{User, UserRole};
use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

lazy_static! {
    static ref HAS_UPPERCASE: Regex = Regex::new(r"[A-Z]").unwrap();
    static ref HAS_LOWERCASE: Regex = Regex::new(r"[a-z]").unwrap();
    static ref HAS_DIGIT: Regex = Regex::new(r"[0-9]").unwrap();
}

/// Passwords need an upper-case letter, a lower-case letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if HAS_UPPERCASE.is_match(password)
        && HAS_LOWERCASE.is_match(password)
        && HAS_DIGIT.is_match(password)
    {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength")
            .with_message("Password must contain an uppercase letter, a lowercase letter and a digit".into()))
    }
}

/// Outward-facing user representation. The password hash is never serialized.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserDTO {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: value.user_id,
            email: value.email,
            name: value.name,
            role: value.role,
            created_at: value.created_at,
        }
    }
}

/// DTO for creating a user. Self-registration always produces a student; the
/// role field is only honored on the admin user-management endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateUserDTO {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(
        length(min = 8, max = 72, message = "Password must be between 8 and 72 characters"),
        custom(function = validate_password_strength)
    )]
    pub password: String,

    pub role: Option<UserRole>,
}

/// DTO for updating a user (admin endpoint, partial update).
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct UpdateUserDTO {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1 and 100 characters"))]
    pub name: Option<String>,

    #[validate(
        length(min = 8, max = 72, message = "Password must be between 8 and 72 characters"),
        custom(function = validate_password_strength)
    )]
    pub password: Option<String>,

    pub role: Option<UserRole>,
}

/// Login request body.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginDTO {
    pub email: String,
    pub password: String,
}

/// Login response: the token is also mirrored into a cookie and the
/// Authorization header for clients that prefer headers.
#[derive(Serialize, Deserialize, Debug)]
pub struct LoginResponseDTO {
    pub token: String,
    pub user: UserDTO,
}
