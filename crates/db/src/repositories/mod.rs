//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod comment_repo;
pub mod incident_repo;
pub mod task_repo;
pub mod user_repo;

pub use alert_repo::AlertRepo;
pub use comment_repo::CommentRepo;
pub use incident_repo::IncidentRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
