//! Session services - mentorship session logging and verification.

use super::{assert_can_verify, verification_stamp};
use crate::core::{AppError, AppState, require_role};
use crate::dtos::{CreateSessionDTO, SessionDTO, UpdateSessionDTO, UpdateStatusDTO};
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
) -> Result<Json<Vec<SessionDTO>>, AppError> {
    let sessions = state.session.find_many_by_student(&student_id).await?;
    let dtos = sessions
        .into_iter()
        .map(SessionDTO::from)
        .collect::<Vec<_>>();
    Ok(Json(dtos))
}

#[instrument(skip(state, current_user, body), fields(user_id = %current_user.user_id))]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateSessionDTO>,
) -> Result<(StatusCode, Json<SessionDTO>), AppError> {
    require_role(&current_user, &[UserRole::Student])?;
    body.validate()?;

    let session = state.session.create(&current_user.user_id, &body).await?;
    info!(session_id = session.session_id, "Session logged");

    Ok((StatusCode::CREATED, Json(SessionDTO::from(session))))
}

#[instrument(skip(state, current_user, body), fields(session_id = %session_id))]
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(session_id): Path<i64>,
    Json(body): Json<UpdateSessionDTO>,
) -> Result<Json<SessionDTO>, AppError> {
    body.validate()?;

    let session = state
        .session
        .read(&session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    if session.student_id != current_user.user_id {
        return Err(AppError::forbidden("You may only edit your own records"));
    }
    if session.status != VerificationStatus::Pending {
        return Err(AppError::conflict("Record has already been reviewed"));
    }

    let updated = state.session.update(&session_id, &body).await?;
    Ok(Json(SessionDTO::from(updated)))
}

#[instrument(skip(state, current_user), fields(session_id = %session_id))]
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(session_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let session = state
        .session
        .read(&session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    if session.student_id != current_user.user_id {
        require_role(&current_user, &[UserRole::Admin])?;
    }

    state.session.delete(&session_id).await?;
    info!("Session deleted");

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user, body), fields(session_id = %session_id, status = ?body.status))]
pub async fn set_session_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(session_id): Path<i64>,
    Json(body): Json<UpdateStatusDTO>,
) -> Result<Json<SessionDTO>, AppError> {
    let session = state
        .session
        .read(&session_id)
        .await?
        .ok_or_else(|| AppError::not_found("Session not found"))?;

    assert_can_verify(&state, &current_user, session.student_id).await?;

    let (verified_by, verified_at) = verification_stamp(body.status, current_user.user_id);
    let updated = state
        .session
        .set_status(&session_id, body.status, verified_by, verified_at)
        .await?;

    info!("Session verification status updated");
    Ok(Json(SessionDTO::from(updated)))
}
