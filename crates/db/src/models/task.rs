//! Task entity model and DTOs.

use incidentdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::TaskStatus;

/// A row from the `tasks` table. Tasks live and die with their incident.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub incident_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

/// DTO for creating a new task. `status` defaults to `pending`.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub incident_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<DbId>,
}

/// DTO for patching a task. All fields are optional.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<DbId>,
}
