//! Qualification services - same life cycle as activities: the student logs,
//! a mentor or admin verifies.

use super::{assert_can_verify, verification_stamp};
use crate::core::{AppError, AppState, require_role};
use crate::dtos::{
    CreateQualificationDTO, QualificationDTO, UpdateQualificationDTO, UpdateStatusDTO,
};
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

#[instrument(skip(state), fields(student_id = %student_id))]
pub async fn list_for_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<QualificationDTO>>, AppError> {
    let qualifications = state
        .qualification
        .find_many_by_student(&student_id)
        .await?;
    let dtos = qualifications
        .into_iter()
        .map(QualificationDTO::from)
        .collect::<Vec<_>>();
    Ok(Json(dtos))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_qualification(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateQualificationDTO>,
) -> Result<(StatusCode, Json<QualificationDTO>), AppError> {
    require_role(&current_user, &[UserRole::Student])?;
    body.validate()?;

    let qualification = state
        .qualification
        .create(&current_user.user_id, &body)
        .await?;
    info!(
        qualification_id = qualification.qualification_id,
        "Qualification logged"
    );

    Ok((
        StatusCode::CREATED,
        Json(QualificationDTO::from(qualification)),
    ))
}

#[instrument(skip(state, current_user, body), fields(qualification_id = %qualification_id))]
pub async fn update_qualification(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(qualification_id): Path<i64>,
    Json(body): Json<UpdateQualificationDTO>,
) -> Result<Json<QualificationDTO>, AppError> {
    body.validate()?;

    let qualification = state
        .qualification
        .read(&qualification_id)
        .await?
        .ok_or_else(|| AppError::not_found("Qualification not found"))?;

    if qualification.student_id != current_user.user_id {
        return Err(AppError::forbidden("You may only edit your own records"));
    }
    if qualification.status != VerificationStatus::Pending {
        return Err(AppError::conflict("Record has already been reviewed"));
    }

    let updated = state
        .qualification
        .update(&qualification_id, &body)
        .await?;
    Ok(Json(QualificationDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(qualification_id = %qualification_id))]
pub async fn delete_qualification(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(qualification_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let qualification = state
        .qualification
        .read(&qualification_id)
        .await?
        .ok_or_else(|| AppError::not_found("Qualification not found"))?;

    if qualification.student_id != current_user.user_id {
        require_role(&current_user, &[UserRole::Admin])?;
    }

    state.qualification.delete(&qualification_id).await?;
    info!("Qualification deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user, body), fields(qualification_id = %qualification_id, status = ?body.status))]
pub async fn set_qualification_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(qualification_id): Path<i64>,
    Json(body): Json<UpdateStatusDTO>,
) -> Result<Json<QualificationDTO>, AppError> {
    let qualification = state
        .qualification
        .read(&qualification_id)
        .await?
        .ok_or_else(|| AppError::not_found("Qualification not found"))?;

    assert_can_verify(&state, &current_user, qualification.student_id).await?;

    let (verified_by, verified_at) = verification_stamp(body.status, current_user.user_id);
    let updated = state
        .qualification
        .set_status(&qualification_id, body.status, verified_by, verified_at)
        .await?;

    info!("Qualification verification status updated");
    Ok(Json(QualificationDTO::from(updated)))
}
