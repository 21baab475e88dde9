//! Message services - direct messaging between assigned mentors and students.

use crate::core::{AppError, AppState};
use crate::dtos::{
    ConversationSummaryDTO, CreateMessageDTO, MessageDTO, MessagesQuery, UnreadCountDTO,
};
use crate::entities::{User, UserRole};
use crate::repositories::Read;
use axum::{
    Extension,
    extract::{Json, Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Messaging rule: admins may message anyone; everyone else only a user they
/// share an assignment with, in either direction. Checked before any row is
/// written or read.
async fn assert_messaging_allowed(
    state: &AppState,
    actor: &User,
    peer_id: i64,
) -> Result<(), AppError> {
    if actor.role == UserRole::Admin {
        return Ok(());
    }

    // Threads started by an admin stay readable for the other side.
    if let Some(peer) = state.user.read(&peer_id).await? {
        if peer.role == UserRole::Admin {
            return Ok(());
        }
    }

    if !state.assignment.linked(&actor.user_id, &peer_id).await? {
        warn!(
            "User {} attempted to message unlinked user {}",
            actor.user_id, peer_id
        );
        return Err(AppError::forbidden(
            "No mentorship assignment links you to this user",
        ));
    }

    Ok(())
}

#[instrument(skip(state, current_user, body), fields(sender_id = %current_user.user_id, receiver_id = %body.receiver_id))]
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Json(body): Json<CreateMessageDTO>,
) -> Result<(StatusCode, Json<MessageDTO>), AppError> {
    body.validate()?;

    if body.receiver_id == current_user.user_id {
        return Err(AppError::bad_request("You cannot message yourself"));
    }

    state
        .user
        .read(&body.receiver_id)
        .await?
        .ok_or_else(|| AppError::not_found("Receiver not found"))?;

    assert_messaging_allowed(&state, &current_user, body.receiver_id).await?;

    let message = state.msg.create_from(&current_user.user_id, &body).await?;
    info!(message_id = message.message_id, "Message sent");

    Ok((StatusCode::CREATED, Json(MessageDTO::from(message))))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn list_conversations(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<Vec<ConversationSummaryDTO>>, AppError> {
    let summaries = state.msg.conversation_summaries(&current_user.user_id).await?;
    debug!("Found {} conversations", summaries.len());
    Ok(Json(summaries))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, peer_id = %peer_id))]
pub async fn get_conversation(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(peer_id): Path<i64>,
    Query(params): Query<MessagesQuery>,
) -> Result<Json<Vec<MessageDTO>>, AppError> {
    assert_messaging_allowed(&state, &current_user, peer_id).await?;

    let messages = state
        .msg
        .find_conversation(&current_user.user_id, &peer_id, params.before_date)
        .await?;

    let dtos = messages
        .into_iter()
        .map(MessageDTO::from)
        .collect::<Vec<_>>();
    Ok(Json(dtos))
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id, peer_id = %peer_id))]
pub async fn mark_conversation_read(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
    Path(peer_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let flipped = state.msg.mark_read(&current_user.user_id, &peer_id).await?;
    debug!("Marked {} messages as read", flipped);
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state, current_user), fields(user_id = %current_user.user_id))]
pub async fn unread_count(
    State(state): State<Arc<AppState>>,
    Extension(current_user): Extension<User>,
) -> Result<Json<UnreadCountDTO>, AppError> {
    let unread = state.msg.unread_count(&current_user.user_id).await?;
    Ok(Json(UnreadCountDTO { unread }))
}
