//! CV services - multipart upload, listing and verification of CV documents.

use super::{assert_can_verify, verification_stamp};
use crate::core::{AppError, AppState, require_role};
use crate::dtos::{CreateCvDTO, CvDTO, UpdateStatusDTO};
use crate::entities::{User, UserRole};
use crate::repositories::{Delete, Read};
use axum::{
    Extension,
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
};
use axum_macros::debug_handler;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

#[instrument(skip(state), fields(student_id = %student_id))]
pub async fn list_for_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<CvDTO>>, AppError> {
    let cvs = state.cv.find_many_by_student(&student_id).await?;
    let dtos = cvs.into_iter().map(CvDTO::from).collect::<Vec<_>>();
    Ok(Json(dtos))
}

/// Expects `multipart/form-data` with a `label` text field and a `file` field.
/// The file is stored under the upload directory with a UUID name so uploads
/// can never collide or traverse outside the directory.
#[debug_handler]
#[instrument(skip(state, current_user, multipart), fields(user_id = %current_user.user_id))]
pub async fn upload_cv(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CvDTO>), AppError> {
    require_role(&current_user, &[UserRole::Student])?;

    // The file part may hit the disk before the request is rejected (missing
    // label, malformed body, failed validation). `stored_path` tracks what was
    // written so every rejection after the write removes it again.
    let mut stored_path: Option<PathBuf> = None;
    let dto = match read_upload_form(
        &state,
        &mut multipart,
        current_user.user_id,
        &mut stored_path,
    )
    .await
    {
        Ok(dto) => dto,
        Err(e) => {
            discard_stored_file(stored_path.as_deref()).await;
            return Err(e);
        }
    };

    let cv = match state.cv.create(&dto).await {
        Ok(cv) => cv,
        Err(e) => {
            discard_stored_file(stored_path.as_deref()).await;
            return Err(AppError::from(e));
        }
    };
    info!(cv_id = cv.cv_id, "CV uploaded");

    Ok((StatusCode::CREATED, Json(CvDTO::from(cv))))
}

/// Drains the multipart body into a validated [`CreateCvDTO`]. The file part
/// is streamed to disk as it arrives; its path is published through
/// `stored_path` before the first byte is written, so the caller knows what to
/// clean up on any error exit.
async fn read_upload_form(
    state: &AppState,
    multipart: &mut Multipart,
    student_id: i64,
    stored_path: &mut Option<PathBuf>,
) -> Result<CreateCvDTO, AppError> {
    let mut label: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::bad_request("Malformed multipart body"))?
    {
        match field.name() {
            Some("label") => {
                let text = field
                    .text()
                    .await
                    .map_err(|_| AppError::bad_request("Malformed multipart body"))?;
                label = Some(text);
            }
            Some("file") => {
                // Keep the client's extension, replace the name with a UUID.
                let extension = field
                    .file_name()
                    .and_then(|name| name.rsplit_once('.'))
                    .map(|(_, ext)| format!(".{ext}"))
                    .unwrap_or_default();
                let path = state
                    .upload_dir
                    .join(format!("{}{}", Uuid::new_v4(), extension));
                *stored_path = Some(path.clone());

                let mut file = tokio::fs::File::create(&path).await?;
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|_| AppError::bad_request("Malformed multipart body"))?
                {
                    file.write_all(&chunk).await?;
                }
                file.flush().await?;
            }
            _ => {}
        }
    }

    let label = label.ok_or_else(|| AppError::bad_request("Missing label field"))?;
    let file_path = stored_path
        .as_ref()
        .ok_or_else(|| AppError::bad_request("Missing file field"))?
        .to_string_lossy()
        .into_owned();

    let dto = CreateCvDTO {
        student_id,
        label,
        file_path,
    };
    dto.validate()?;
    Ok(dto)
}

async fn discard_stored_file(path: Option<&std::path::Path>) {
    if let Some(path) = path {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Could not remove rejected upload {}: {}", path.display(), e);
        }
    }
}

#[instrument(skip(state, current_user), fields(cv_id = %cv_id))]
pub async fn delete_cv(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(cv_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let cv = state
        .cv
        .read(&cv_id)
        .await?
        .ok_or_else(|| AppError::not_found("CV not found"))?;

    if cv.student_id != current_user.user_id {
        require_role(&current_user, &[UserRole::Admin])?;
    }

    state.cv.delete(&cv_id).await?;

    // Best effort: a file missing from disk should not fail the request.
    if let Err(e) = tokio::fs::remove_file(&cv.file_path).await {
        warn!("Could not remove uploaded file {}: {}", cv.file_path, e);
    }

    info!("CV deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user, body), fields(cv_id = %cv_id, status = ?body.status))]
pub async fn set_cv_status(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(cv_id): Path<i64>,
    Json(body): Json<UpdateStatusDTO>,
) -> Result<Json<CvDTO>, AppError> {
    let cv = state
        .cv
        .read(&cv_id)
        .await?
        .ok_or_else(|| AppError::not_found("CV not found"))?;

    assert_can_verify(&state, &current_user, cv.student_id).await?;

    let (verified_by, verified_at) = verification_stamp(body.status, current_user.user_id);
    let updated = state
        .cv
        .set_status(&cv_id, body.status, verified_by, verified_at)
        .await?;

    info!("CV verification status updated");
    Ok(Json(CvDTO::from(updated)))
}
