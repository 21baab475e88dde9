//! Core module - infrastructure shared by every route
//!
//! - JWT authentication and access-scope middleware
//! - Configuration
//! - Error handling
//! - Application state

pub mod auth;
pub mod config;
pub mod error;
pub mod state;

pub use auth::{
    Claims, assert_student_scope, authentication_middleware, decode_jwt, encode_jwt,
    require_role, student_access_middleware,
};
pub use config::Config;
pub use error::AppError;
pub use state::AppState;
