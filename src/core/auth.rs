//! JWT authentication and access-scope enforcement.
//!
//! The original system re-declared its token and role checks in every route,
//! with several paths trusting an unverified payload. Here the contract lives
//! in one place: tokens are always signature-checked and the caller's role is
//! re-read from the database, never taken from the token claims.

use crate::core::{AppError, AppState};
use crate::entities::{User, UserRole};
use crate::repositories::Read;
use axum::extract::{Path, State};
use axum::{Error, body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Contents of the JWT. The embedded role is informational for clients only;
/// authorization always uses the role stored in the users table.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    pub id: i64,
    pub email: String,
    pub role: UserRole,
}

#[instrument(skip(secret), fields(email = %email, id = %id))]
pub fn encode_jwt(
    id: i64,
    email: String,
    role: UserRole,
    secret: &str,
) -> Result<String, Error> {
    debug!("Encoding JWT token for user");
    let now = Utc::now();
    let expire = Duration::hours(24);
    let claims = Claims {
        exp: (now + expire).timestamp() as usize,
        iat: now.timestamp() as usize,
        id,
        email,
        role,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )
    .map_err(|e| {
        warn!("Failed to encode JWT token: {:?}", e);
        Error::new("Error in encoding jwt token")
    })
}

#[instrument(skip(jwt_token, secret))]
pub fn decode_jwt(jwt_token: &str, secret: &str) -> Result<TokenData<Claims>, Error> {
    decode(
        jwt_token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Failed to decode JWT token: {:?}", e);
        Error::new("Error in decoding jwt token")
    })
}

/// Pulls the token out of the request: `Authorization: Bearer` first, then the
/// `token` cookie set by the login endpoint. The original checked these in a
/// different order per route; this is the single precedence now.
fn extract_token(req: &Request) -> Option<String> {
    if let Some(auth_header) = req.headers().get(http::header::AUTHORIZATION) {
        if let Ok(value) = auth_header.to_str() {
            if let Some(token) = value.strip_prefix("Bearer ") {
                if !token.trim().is_empty() {
                    return Some(token.trim().to_string());
                }
            }
        }
    }

    let cookies = req.headers().get(http::header::COOKIE)?.to_str().ok()?;
    cookies
        .split(';')
        .filter_map(|pair| pair.trim().strip_prefix("token="))
        .find(|token| !token.is_empty())
        .map(|token| token.to_string())
}

/// Validates the token and injects the authenticated `User` as an Extension.
/// Missing or invalid credentials are always 401; role mismatches are decided
/// later by the handlers (403).
#[instrument(skip(state, req, next))]
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let token = extract_token(&req).ok_or_else(|| {
        warn!("Missing bearer token and token cookie");
        AppError::unauthorized("Unauthorized")
    })?;

    let token_data = decode_jwt(&token, &state.jwt_secret).map_err(|_| {
        warn!("Rejected token with invalid signature or expiry");
        AppError::unauthorized("Unauthorized")
    })?;

    // Fetch the caller from the database; the token's role claim is ignored.
    let current_user = state
        .user
        .read(&token_data.claims.id)
        .await?
        .ok_or_else(|| {
            warn!("Token references unknown user {}", token_data.claims.id);
            AppError::unauthorized("Unauthorized")
        })?;

    debug!(user_id = current_user.user_id, role = ?current_user.role, "Caller authenticated");
    req.extensions_mut().insert(current_user);
    Ok(next.run(req).await)
}

/// Middleware for `/students/{student_id}/...` routes: verifies the caller may
/// see that student's data. Admins pass, the student passes for their own id,
/// a mentor passes only when an assignment pairs them with the student.
#[instrument(skip(state, req, next), fields(student_id = %student_id))]
pub async fn student_access_middleware(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<i64>,
    req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let current_user = req
        .extensions()
        .get::<User>()
        .ok_or_else(|| {
            warn!("User not found in request extensions");
            AppError::unauthorized("Unauthorized")
        })?
        .clone();

    assert_student_scope(&state, &current_user, student_id).await?;
    Ok(next.run(req).await)
}

/// Shared scope check behind [`student_access_middleware`], also used by the
/// handlers that look up users directly.
pub async fn assert_student_scope(
    state: &AppState,
    actor: &User,
    student_id: i64,
) -> Result<(), AppError> {
    match actor.role {
        UserRole::Admin => Ok(()),
        UserRole::Student if actor.user_id == student_id => Ok(()),
        UserRole::Mentor => {
            let assigned = state
                .assignment
                .find_by_pair(&actor.user_id, &student_id)
                .await?
                .is_some();
            if assigned {
                Ok(())
            } else {
                warn!(
                    "Mentor {} has no assignment for student {}",
                    actor.user_id, student_id
                );
                Err(AppError::forbidden(
                    "You are not assigned to this student",
                ))
            }
        }
        _ => {
            warn!(
                "User {} attempted to access data of student {}",
                actor.user_id, student_id
            );
            Err(AppError::forbidden("You may only access your own records"))
        }
    }
}

/// Verifies that a user holds one of the required roles.
#[instrument(skip(user))]
pub fn require_role(user: &User, allowed_roles: &[UserRole]) -> Result<(), AppError> {
    if !allowed_roles.contains(&user.role) {
        warn!(
            "User {} has insufficient role {:?}, required one of: {:?}",
            user.user_id, user.role, allowed_roles
        );
        return Err(AppError::forbidden("Insufficient role").with_details(format!(
            "This action requires one of the following roles: {:?}",
            allowed_roles
        )));
    }
    Ok(())
}
