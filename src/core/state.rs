//! Application state shared by every route and middleware.

use crate::repositories::{
    ActivityRepository, AssignmentRepository, CvRepository, MessageRepository,
    QualificationRepository, SessionRepository, UserRepository,
};
use sqlx::SqlitePool;
use std::path::PathBuf;

pub struct AppState {
    pub user: UserRepository,
    pub assignment: AssignmentRepository,
    pub activity: ActivityRepository,
    pub qualification: QualificationRepository,
    pub session: SessionRepository,
    pub cv: CvRepository,
    pub msg: MessageRepository,

    /// Secret key for signing JWT tokens.
    pub jwt_secret: String,

    /// Directory where uploaded CV files are stored.
    pub upload_dir: PathBuf,

    /// Raw pool handle, kept for the health endpoint.
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(pool: SqlitePool, jwt_secret: String, upload_dir: PathBuf) -> Self {
        Self {
            user: UserRepository::new(pool.clone()),
            assignment: AssignmentRepository::new(pool.clone()),
            activity: ActivityRepository::new(pool.clone()),
            qualification: QualificationRepository::new(pool.clone()),
            session: SessionRepository::new(pool.clone()),
            cv: CvRepository::new(pool.clone()),
            msg: MessageRepository::new(pool.clone()),
            jwt_secret,
            upload_dir,
            pool,
        }
    }
}
