//! Database entities, one module per table.

pub mod activity;
pub mod assignment;
pub mod cv;
pub mod enums;
pub mod message;
pub mod qualification;
pub mod session;
pub mod user;

pub use activity::Activity;
pub use assignment::Assignment;
pub use cv::StudentCv;
pub use enums::{UserRole, VerificationStatus};
pub use message::Message;
pub use qualification::Qualification;
pub use session::Session;
pub use user::User;
