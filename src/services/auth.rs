//! Auth services - registration and login.

use crate::core::{AppError, AppState, encode_jwt};
use crate::dtos::{CreateUserDTO, LoginDTO, LoginResponseDTO, UserDTO};
use crate::entities::User;
use crate::repositories::Create;
use axum::{
    extract::{Json, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateUserDTO>,
) -> Result<(StatusCode, Json<UserDTO>), AppError> {
    // 1. Validate email format, name length and password strength
    // 2. Reject duplicate emails before inserting, so no second row is written
    // 3. Hash the password and store the user as a student
    body.validate()?;

    if state.user.find_by_email(&body.email).await?.is_some() {
        warn!("Registration attempt with an email that is already in use");
        return Err(AppError::bad_request("Email already registered"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    // Self-registration cannot choose a role; only admins create mentors.
    let new_user = CreateUserDTO {
        email: body.email,
        name: body.name,
        password: password_hash,
        role: None,
    };

    // Two racing registrations can both pass the pre-check; the insert that
    // loses on the UNIQUE constraint gets the same 400 as the pre-check.
    let created_user = state.user.create(&new_user).await.map_err(|e| {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            warn!("Registration attempt with an email that is already in use");
            AppError::bad_request("Email already registered")
        } else {
            AppError::from(e)
        }
    })?;
    info!(user_id = created_user.user_id, "Registered new student");

    Ok((StatusCode::CREATED, Json(UserDTO::from(created_user))))
}

#[instrument(skip(state, body), fields(email = %body.email))]
pub async fn login_user(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginDTO>,
) -> Result<impl IntoResponse, AppError> {
    // 1. Look the user up by email; unknown email and wrong password produce
    //    the same 401 so the endpoint does not leak which emails exist
    // 2. Issue a JWT and return it both as an HttpOnly cookie and in the body
    let user = match state.user.find_by_email(&body.email).await? {
        Some(user) => user,
        None => return Err(AppError::unauthorized("Invalid email or password")),
    };

    if !user.verify_password(&body.password) {
        warn!(user_id = user.user_id, "Login with wrong password");
        return Err(AppError::unauthorized("Invalid email or password"));
    }

    let token = encode_jwt(user.user_id, user.email.clone(), user.role, &state.jwt_secret)?;

    let cookie_value = format!(
        "token={}; HttpOnly; Secure; SameSite=Lax; Max-Age={}",
        token,
        24 * 60 * 60
    );

    let mut headers = HeaderMap::new();
    headers.insert(
        "Set-Cookie",
        HeaderValue::from_str(&cookie_value)
            .map_err(|_| AppError::internal_server_error("Failed to build cookie header"))?,
    );
    headers.insert(
        "Authorization",
        HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::internal_server_error("Failed to build auth header"))?,
    );

    info!(user_id = user.user_id, "Login successful");
    let response = LoginResponseDTO {
        token,
        user: UserDTO::from(user),
    };

    Ok((StatusCode::OK, headers, Json(response)))
}
