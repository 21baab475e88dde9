//! User services - profile access and admin user management.

use crate::core::{AppError, AppState, assert_student_scope, require_role};
use crate::dtos::{CreateUserDTO, UpdateUserDTO, UserDTO, UserSearchQuery};
use crate::entities::{User, UserRole};
use crate::repositories::{Create, Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use futures::future;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

#[instrument(skip(current_user), fields(user_id = %current_user.user_id))]
pub async fn get_me(
    Extension(current_user): Extension<User>,
) -> Result<Json<UserDTO>, AppError> {
    Ok(Json(UserDTO::from(current_user)))
}

#[instrument(skip(state, current_user))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Query(params): Query<UserSearchQuery>,
) -> Result<Json<Vec<UserDTO>>, AppError> {
    require_role(&current_user, &[UserRole::Admin])?;

    let users = state.user.list(params.search.as_deref()).await?;
    debug!("Listing {} users", users.len());

    let users_dto = users.into_iter().map(UserDTO::from).collect::<Vec<_>>();
    Ok(Json(users_dto))
}

#[instrument(skip(state, current_user, body), fields(email = %body.email))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateUserDTO>,
) -> Result<(StatusCode, Json<UserDTO>), AppError> {
    // Admin-only creation; unlike self-registration the role field is honored.
    require_role(&current_user, &[UserRole::Admin])?;
    body.validate()?;

    if state.user.find_by_email(&body.email).await?.is_some() {
        return Err(AppError::bad_request("Email already registered"));
    }

    let password_hash = User::hash_password(&body.password)
        .map_err(|_| AppError::internal_server_error("Failed to hash password"))?;

    let new_user = CreateUserDTO {
        email: body.email,
        name: body.name,
        password: password_hash,
        role: body.role,
    };

    // Same duplicate-email contract as registration when a concurrent insert
    // slips past the pre-check.
    let created_user = state.user.create(&new_user).await.map_err(|e| {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            AppError::bad_request("Email already registered")
        } else {
            AppError::from(e)
        }
    })?;
    info!(
        user_id = created_user.user_id,
        role = ?created_user.role,
        "Admin created user"
    );

    Ok((StatusCode::CREATED, Json(UserDTO::from(created_user))))
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn get_user_by_id(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDTO>, AppError> {
    let target = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    // Admins and the user themselves always pass. Mentors pass for students
    // they are assigned to; everything else is forbidden.
    if current_user.user_id != target.user_id {
        match target.role {
            UserRole::Student => {
                assert_student_scope(&state, &current_user, target.user_id).await?
            }
            _ => require_role(&current_user, &[UserRole::Admin])?,
        }
    }

    Ok(Json(UserDTO::from(target)))
}

#[instrument(skip(state, current_user, body), fields(user_id = %user_id))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i64>,
    Json(body): Json<UpdateUserDTO>,
) -> Result<Json<UserDTO>, AppError> {
    require_role(&current_user, &[UserRole::Admin])?;
    body.validate()?;

    let UpdateUserDTO {
        name,
        password,
        role,
    } = body;
    let update = UpdateUserDTO {
        name,
        role,
        password: match password {
            Some(password) => Some(
                User::hash_password(&password)
                    .map_err(|_| AppError::internal_server_error("Failed to hash password"))?,
            ),
            None => None,
        },
    };

    let updated = state.user.update(&user_id, &update).await?;
    info!("User updated");

    Ok(Json(UserDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(user_id = %user_id))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[UserRole::Admin])?;

    let target = state
        .user
        .read(&user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    // Remove any uploaded CV files before the rows cascade away. File removal
    // is best effort: a missing file must not block the account deletion.
    let cvs = state.cv.find_many_by_student(&target.user_id).await?;
    if !cvs.is_empty() {
        debug!("Removing {} uploaded files", cvs.len());
        future::join_all(
            cvs.iter()
                .map(|cv| tokio::fs::remove_file(cv.file_path.clone())),
        )
        .await
        .into_iter()
        .filter_map(|r| r.err())
        .for_each(|e| warn!("Could not remove uploaded file: {}", e));
    }

    state.user.delete(&target.user_id).await?;
    info!("User deleted");

    Ok(StatusCode::NO_CONTENT)
}
