//! Assignment services - admin management of mentor/student pairings.

use crate::core::{AppError, AppState, require_role};
use crate::dtos::{AssignmentDTO, CreateAssignmentDTO};
use crate::entities::{User, UserRole};
use crate::repositories::{Create, Delete, Read};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Each role sees a different slice: admins the full table, mentors and
/// students only the pairings they appear in.
#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_assignments(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<AssignmentDTO>>, AppError> {
    let assignments = match current_user.role {
        UserRole::Admin => state.assignment.list_all().await?,
        UserRole::Mentor => {
            state
                .assignment
                .find_many_by_mentor(&current_user.user_id)
                .await?
        }
        UserRole::Student => {
            state
                .assignment
                .find_many_by_student(&current_user.user_id)
                .await?
        }
    };

    let dtos = assignments
        .into_iter()
        .map(AssignmentDTO::from)
        .collect::<Vec<_>>();
    Ok(Json(dtos))
}

#[instrument(skip(state, current_user, body), fields(mentor_id = %body.mentor_id, student_id = %body.student_id))]
pub async fn create_assignment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateAssignmentDTO>,
) -> Result<(StatusCode, Json<AssignmentDTO>), AppError> {
    // 1. Only admins pair users
    // 2. Both sides must exist and hold the right role
    // 3. The UNIQUE constraint turns a duplicate pairing into a 409
    require_role(&current_user, &[UserRole::Admin])?;
    body.validate()?;

    let mentor = state
        .user
        .read(&body.mentor_id)
        .await?
        .ok_or_else(|| AppError::not_found("Mentor not found"))?;
    if mentor.role != UserRole::Mentor {
        return Err(AppError::bad_request("mentor_id does not refer to a mentor"));
    }

    let student = state
        .user
        .read(&body.student_id)
        .await?
        .ok_or_else(|| AppError::not_found("Student not found"))?;
    if student.role != UserRole::Student {
        return Err(AppError::bad_request(
            "student_id does not refer to a student",
        ));
    }

    let assignment = state.assignment.create(&body).await.map_err(|e| {
        if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
            AppError::conflict("This mentor is already assigned to this student")
        } else {
            AppError::from(e)
        }
    })?;

    info!(
        assignment_id = assignment.assignment_id,
        "Assignment created"
    );
    Ok((StatusCode::CREATED, Json(AssignmentDTO::from(assignment))))
}

#[instrument(skip(state, current_user), fields(assignment_id = %assignment_id))]
pub async fn delete_assignment(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(assignment_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    require_role(&current_user, &[UserRole::Admin])?;

    state
        .assignment
        .read(&assignment_id)
        .await?
        .ok_or_else(|| AppError::not_found("Assignment not found"))?;

    state.assignment.delete(&assignment_id).await?;
    info!("Assignment deleted");

    Ok(StatusCode::NO_CONTENT)
}
