#![allow(dead_code)]

use axum_test::TestServer;
use passport_server::core::AppState;
use passport_server::entities::UserRole;
use sqlx::SqlitePool;
use std::sync::Arc;

pub const TEST_JWT_SECRET: &str = "test-secret-change-me-outside-tests";

/// Builds an AppState over the test pool, with a per-test upload directory so
/// CV upload tests cannot collide.
pub fn create_test_state(pool: SqlitePool) -> Arc<AppState> {
    let upload_dir = std::env::temp_dir().join(format!("passport-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&upload_dir).expect("Failed to create test upload dir");

    Arc::new(AppState::new(
        pool,
        TEST_JWT_SECRET.to_string(),
        upload_dir,
    ))
}

pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = passport_server::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Signs a JWT for a fixture user. The role claim is informational only; the
/// middleware re-reads the role from the database.
pub fn create_test_jwt(user_id: i64, email: &str, role: UserRole, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Claims {
        exp: usize,
        iat: usize,
        id: i64,
        email: String,
        role: UserRole,
    }

    let now = Utc::now();
    let expiration = now
        .checked_add_signed(Duration::hours(24))
        .expect("valid timestamp")
        .timestamp() as usize;

    let claims = Claims {
        exp: expiration,
        iat: now.timestamp() as usize,
        id: user_id,
        email: email.to_string(),
        role,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT token")
}

/// Tokens for the fixture accounts in `fixtures/users.sql`.
pub fn admin_token() -> String {
    create_test_jwt(1, "admin@passport.test", UserRole::Admin, TEST_JWT_SECRET)
}

pub fn marta_token() -> String {
    create_test_jwt(2, "marta@passport.test", UserRole::Mentor, TEST_JWT_SECRET)
}

pub fn milo_token() -> String {
    create_test_jwt(3, "milo@passport.test", UserRole::Mentor, TEST_JWT_SECRET)
}

pub fn sara_token() -> String {
    create_test_jwt(4, "sara@passport.test", UserRole::Student, TEST_JWT_SECRET)
}

pub fn simon_token() -> String {
    create_test_jwt(5, "simon@passport.test", UserRole::Student, TEST_JWT_SECRET)
}

pub fn stella_token() -> String {
    create_test_jwt(6, "stella@passport.test", UserRole::Student, TEST_JWT_SECRET)
}
