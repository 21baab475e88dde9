//! DTOs module - Data Transfer Objects
//!
//! DTOs separate the external (API) representation from the internal entity
//! representation. Create/Update DTOs carry validator annotations; response
//! DTOs never expose password hashes or file-system details clients don't own.

pub mod activity;
pub mod assignment;
pub mod cv;
pub mod message;
pub mod qualification;
pub mod query;
pub mod session;
pub mod user;

pub use activity::{ActivityDTO, CreateActivityDTO, UpdateActivityDTO};
pub use assignment::{AssignmentDTO, CreateAssignmentDTO};
pub use cv::{CreateCvDTO, CvDTO};
pub use message::{ConversationSummaryDTO, CreateMessageDTO, MessageDTO};
pub use qualification::{CreateQualificationDTO, QualificationDTO, UpdateQualificationDTO};
pub use query::{MessagesQuery, UnreadCountDTO, UpdateStatusDTO, UserSearchQuery};
pub use session::{CreateSessionDTO, SessionDTO, UpdateSessionDTO};
pub use user::{CreateUserDTO, LoginDTO, LoginResponseDTO, UpdateUserDTO, UserDTO};
