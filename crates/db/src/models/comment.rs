//! Comment entity model and DTOs.

use incidentdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
///
/// Exactly one of `incident_id` / `task_id` is set; the `ck_comments_target`
/// check constraint rejects any write that breaks this.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub incident_id: Option<DbId>,
    pub task_id: Option<DbId>,
    pub user_id: DbId,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Comment {
    /// The entity this comment is attached to.
    ///
    /// Always `Some` for rows read back from the database.
    pub fn target(&self) -> Option<CommentTarget> {
        match (self.incident_id, self.task_id) {
            (Some(id), None) => Some(CommentTarget::Incident(id)),
            (None, Some(id)) => Some(CommentTarget::Task(id)),
            _ => None,
        }
    }
}

/// What a comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CommentTarget {
    Incident(DbId),
    Task(DbId),
}

impl CommentTarget {
    /// Split into the `(incident_id, task_id)` column pair.
    pub fn columns(self) -> (Option<DbId>, Option<DbId>) {
        match self {
            CommentTarget::Incident(id) => (Some(id), None),
            CommentTarget::Task(id) => (None, Some(id)),
        }
    }
}

/// DTO for creating a new comment.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub target: CommentTarget,
    pub user_id: DbId,
    pub content: String,
}
