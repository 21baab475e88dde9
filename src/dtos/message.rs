//! Message DTOs.

use crate::entities::Message;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MessageDTO {
    pub message_id: i64,
    pub sender_id: i64,
    pub receiver_id: i64,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageDTO {
    fn from(value: Message) -> Self {
        Self {
            message_id: value.message_id,
            sender_id: value.sender_id,
            receiver_id: value.receiver_id,
            content: value.content,
            is_read: value.is_read,
            created_at: value.created_at,
        }
    }
}

/// DTO for sending a message. The sender is always the authenticated caller.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct CreateMessageDTO {
    pub receiver_id: i64,

    #[validate(length(min = 1, max = 5000, message = "Message content must be between 1 and 5000 characters"))]
    pub content: String,
}

/// One row per conversation peer, produced by the window-function query in the
/// message repository: the latest message exchanged with that peer plus the
/// number of their messages the caller has not read yet.
#[derive(Serialize, Deserialize, Debug, Clone, FromRow)]
pub struct ConversationSummaryDTO {
    pub peer_id: i64,
    pub peer_name: String,
    pub last_message: String,
    pub last_sender_id: i64,
    pub last_sent_at: DateTime<Utc>,
    pub unread_count: i64,
}
