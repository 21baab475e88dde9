//! Activity services - logging and verifying practice activities.

use super::{assert_can_verify, verification_stamp};
use crate::core::{AppError, AppState, require_role};
use crate::dtos::{ActivityDTO, CreateActivityDTO, UpdateActivityDTO, UpdateStatusDTO};
use crate::entities::{User, UserRole, VerificationStatus};
use crate::repositories::{Delete, Read, Update};
use axum::{
    Extension,
    extract::{Json, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, instrument};
use validator::Validate;

/// Scope is enforced by the student-access middleware on the
/// `/students/{student_id}` subtree before this handler runs.
#[instrument(skip(state), fields(student_id = %student_id))]
pub async fn list_for_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<ActivityDTO>>, AppError> {
    let activities = state.activity.find_many_by_student(&student_id).await?;
    let dtos = activities
        .into_iter()
        .map(ActivityDTO::from)
        .collect::<Vec<_>>();
    Ok(Json(dtos))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_activity(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateActivityDTO>,
) -> Result<(StatusCode, Json<ActivityDTO>), AppError> {
    require_role(&current_user, &[UserRole::Student])?;
    body.validate()?;

    let activity = state.activity.create(&current_user.user_id, &body).await?;
    info!(activity_id = activity.activity_id, "Activity logged");

    Ok((StatusCode::CREATED, Json(ActivityDTO::from(activity))))
}

#[instrument(skip(state, current_user, body), fields(activity_id = %activity_id))]
pub async fn update_activity(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(activity_id): Path<i64>,
    Json(body): Json<UpdateActivityDTO>,
) -> Result<Json<ActivityDTO>, AppError> {
    body.validate()?;

    let activity = state
        .activity
        .read(&activity_id)
        .await?
        .ok_or_else(|| AppError::not_found("Activity not found"))?;

    if activity.student_id != current_user.user_id {
        return Err(AppError::forbidden("You may only edit your own records"));
    }
    // A verification decision freezes the record; it has to be reset to
    // pending before the student can edit it again.
    if activity.status != VerificationStatus::Pending {
        return Err(AppError::conflict("Record has already been reviewed"));
    }

    let updated = state.activity.update(&activity_id, &body).await?;
    Ok(Json(ActivityDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(activity_id = %activity_id))]
pub async fn delete_activity(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(activity_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let activity = state
        .activity
        .read(&activity_id)
        .await?
        .ok_or_else(|| AppError::not_found("Activity not found"))?;

    if activity.student_id != current_user.user_id {
        require_role(&current_user, &[UserRole::Admin])?;
    }

    state.activity.delete(&activity_id).await?;
    info!("Activity deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user, body), fields(activity_id = %activity_id, status = ?body.status))]
pub async fn set_activity_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(activity_id): Path<i64>,
    Json(body): Json<UpdateStatusDTO>,
) -> Result<Json<ActivityDTO>, AppError> {
    let activity = state
        .activity
        .read(&activity_id)
        .await?
        .ok_or_else(|| AppError::not_found("Activity not found"))?;

    assert_can_verify(&state, &current_user, activity.student_id).await?;

    let (verified_by, verified_at) = verification_stamp(body.status, current_user.user_id);
    let updated = state
        .activity
        .set_status(&activity_id, body.status, verified_by, verified_at)
        .await?;

    info!("Activity verification status updated");
    Ok(Json(ActivityDTO::from(updated)))
}
