//! Services module - one file per route group, plus the root and health
//! handlers and a couple of helpers shared by the verification endpoints.

pub mod activity;
pub mod assignment;
pub mod auth;
pub mod cv;
pub mod message;
pub mod qualification;
pub mod session;
pub mod user;

use crate::core::{AppError, AppState, require_role};
use crate::entities::{User, UserRole, VerificationStatus};
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{instrument, warn};

pub async fn root() -> &'static str {
    "Practitioner Passport API"
}

/// Liveness plus a database ping, so load balancers stop routing to an
/// instance whose pool has died.
#[instrument(skip(state))]
pub async fn health(State(state): State<Arc<AppState>>) -> Result<StatusCode, AppError> {
    sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.pool)
        .await
        .map_err(|e| {
            warn!("Health check failed: {}", e);
            AppError::service_unavailable("Database unavailable")
        })?;

    Ok(StatusCode::OK)
}

/// Verification is for admins and for mentors assigned to the record's owner.
/// A student can never verify, not even their own records.
pub(crate) async fn assert_can_verify(
    state: &AppState,
    actor: &User,
    student_id: i64,
) -> Result<(), AppError> {
    require_role(actor, &[UserRole::Admin, UserRole::Mentor])?;

    if actor.role == UserRole::Mentor {
        let assigned = state
            .assignment
            .find_by_pair(&actor.user_id, &student_id)
            .await?
            .is_some();
        if !assigned {
            warn!(
                "Mentor {} tried to verify a record of unassigned student {}",
                actor.user_id, student_id
            );
            return Err(AppError::forbidden("You are not assigned to this student"));
        }
    }

    Ok(())
}

/// Verifier columns for a status change: a decision stamps who and when,
/// resetting to pending clears both.
pub(crate) fn verification_stamp(
    status: VerificationStatus,
    verifier_id: i64,
) -> (Option<i64>, Option<DateTime<Utc>>) {
    match status {
        VerificationStatus::Pending => (None, None),
        VerificationStatus::Verified | VerificationStatus::Rejected => {
            (Some(verifier_id), Some(Utc::now()))
        }
    }
}
