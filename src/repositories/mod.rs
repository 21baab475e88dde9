//! Repositories module - one repository per entity.
//!
//! Queries are runtime-checked (`sqlx::query_as::<_, T>` against `FromRow`
//! derives) so the crate builds without a provisioned database; integration
//! tests run them against migrated SQLite databases via `#[sqlx::test]`.

pub mod activity;
pub mod assignment;
pub mod cv;
pub mod message;
pub mod qualification;
pub mod session;
pub mod traits;
pub mod user;

pub use traits::{Create, Delete, Read, Update};

pub use activity::ActivityRepository;
pub use assignment::AssignmentRepository;
pub use cv::CvRepository;
pub use message::MessageRepository;
pub use qualification::QualificationRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
