//! MessageRepository - database operations for direct messages.

use super::Read;
use crate::dtos::{ConversationSummaryDTO, CreateMessageDTO};
use crate::entities::Message;
use chrono::{DateTime, Utc};
use sqlx::{Error, SqlitePool};

const MESSAGE_COLUMNS: &str = "message_id, sender_id, receiver_id, content, is_read, created_at";

/// Page size for conversation history.
const CONVERSATION_PAGE_SIZE: i64 = 50;

pub struct MessageRepository {
    connection_pool: SqlitePool,
}

impl MessageRepository {
    pub fn new(connection_pool: SqlitePool) -> Self {
        Self { connection_pool }
    }

    /// Inserts a message from `sender_id`. Link checks between sender and
    /// receiver belong to the service layer, not here.
    pub async fn create_from(
        &self,
        sender_id: &i64,
        data: &CreateMessageDTO,
    ) -> Result<Message, Error> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages (sender_id, receiver_id, content, is_read, created_at)
             VALUES (?, ?, ?, 0, ?)
             RETURNING {MESSAGE_COLUMNS}"
        ))
        .bind(sender_id)
        .bind(data.receiver_id)
        .bind(&data.content)
        .bind(Utc::now())
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(message)
    }

    /// One page of the thread between `user_id` and `peer_id`, newest first.
    /// With `before_date` set, only messages strictly older than it are
    /// returned, which gives cursor-style pagination on the timestamp.
    pub async fn find_conversation(
        &self,
        user_id: &i64,
        peer_id: &i64,
        before_date: Option<DateTime<Utc>>,
    ) -> Result<Vec<Message>, Error> {
        let messages = if let Some(before_date) = before_date {
            sqlx::query_as::<_, Message>(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE ((sender_id = ? AND receiver_id = ?)
                     OR (sender_id = ? AND receiver_id = ?))
                   AND created_at < ?
                 ORDER BY created_at DESC, message_id DESC
                 LIMIT ?"
            ))
            .bind(user_id)
            .bind(peer_id)
            .bind(peer_id)
            .bind(user_id)
            .bind(before_date)
            .bind(CONVERSATION_PAGE_SIZE)
            .fetch_all(&self.connection_pool)
            .await?
        } else {
            sqlx::query_as::<_, Message>(&format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages
                 WHERE (sender_id = ? AND receiver_id = ?)
                    OR (sender_id = ? AND receiver_id = ?)
                 ORDER BY created_at DESC, message_id DESC
                 LIMIT ?"
            ))
            .bind(user_id)
            .bind(peer_id)
            .bind(peer_id)
            .bind(user_id)
            .bind(CONVERSATION_PAGE_SIZE)
            .fetch_all(&self.connection_pool)
            .await?
        };

        Ok(messages)
    }

    /// One summary row per conversation peer, newest conversation first.
    ///
    /// A window function ranks each peer's messages by recency so that only
    /// the latest one survives; the correlated subquery counts messages from
    /// that peer the caller has not read yet.
    pub async fn conversation_summaries(
        &self,
        user_id: &i64,
    ) -> Result<Vec<ConversationSummaryDTO>, Error> {
        let summaries = sqlx::query_as::<_, ConversationSummaryDTO>(
            "WITH ranked AS (
                 SELECT
                     CASE WHEN sender_id = ? THEN receiver_id ELSE sender_id END AS peer_id,
                     content AS last_message,
                     sender_id AS last_sender_id,
                     created_at AS last_sent_at,
                     ROW_NUMBER() OVER (
                         PARTITION BY CASE WHEN sender_id = ? THEN receiver_id ELSE sender_id END
                         ORDER BY created_at DESC, message_id DESC
                     ) AS rn
                 FROM messages
                 WHERE sender_id = ? OR receiver_id = ?
             )
             SELECT
                 ranked.peer_id,
                 users.name AS peer_name,
                 ranked.last_message,
                 ranked.last_sender_id,
                 ranked.last_sent_at,
                 (SELECT COUNT(*) FROM messages m
                   WHERE m.sender_id = ranked.peer_id
                     AND m.receiver_id = ?
                     AND m.is_read = 0) AS unread_count
             FROM ranked
             JOIN users ON users.user_id = ranked.peer_id
             WHERE ranked.rn = 1
             ORDER BY ranked.last_sent_at DESC",
        )
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .bind(user_id)
        .fetch_all(&self.connection_pool)
        .await?;

        Ok(summaries)
    }

    /// Marks everything `peer_id` sent to `user_id` as read. Returns how many
    /// rows flipped.
    pub async fn mark_read(&self, user_id: &i64, peer_id: &i64) -> Result<u64, Error> {
        let result = sqlx::query(
            "UPDATE messages SET is_read = 1
             WHERE sender_id = ? AND receiver_id = ? AND is_read = 0",
        )
        .bind(peer_id)
        .bind(user_id)
        .execute(&self.connection_pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Total unread messages addressed to `user_id`, across all peers.
    pub async fn unread_count(&self, user_id: &i64) -> Result<i64, Error> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = ? AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(&self.connection_pool)
        .await?;

        Ok(count)
    }
}

impl Read<Message, i64> for MessageRepository {
    async fn read(&self, id: &i64) -> Result<Option<Message>, Error> {
        let message = sqlx::query_as::<_, Message>(&format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages WHERE message_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.connection_pool)
        .await?;

        Ok(message)
    }
}
