//! Query-string and small shared DTOs.

use crate::entities::VerificationStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters for the admin user list.
#[derive(Serialize, Deserialize, Debug)]
pub struct UserSearchQuery {
    #[serde(default)]
    pub search: Option<String>,
}

/// Query parameters for message-thread pagination: pass the oldest timestamp
/// already loaded to fetch the page before it.
#[derive(Serialize, Deserialize, Debug)]
pub struct MessagesQuery {
    #[serde(default)]
    pub before_date: Option<DateTime<Utc>>,
}

/// Body for the verification endpoints on activities, qualifications,
/// sessions and CVs.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UpdateStatusDTO {
    pub status: VerificationStatus,
}

/// Response for GET /messages/unread.
#[derive(Serialize, Deserialize, Debug)]
pub struct UnreadCountDTO {
    pub unread: i64,
}
