//! Incident entity model and DTOs.

use incidentdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::{IncidentSeverity, IncidentStatus};

/// A row from the `incidents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Incident {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub severity: IncidentSeverity,
    pub status: IncidentStatus,
    /// Owning user. Deleting that user deletes the incident.
    pub created_by: DbId,
    /// Set to NULL when the assignee is deleted.
    pub assigned_to: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub resolved_at: Option<Timestamp>,
}

/// DTO for creating a new incident. `status` defaults to `open`.
#[derive(Debug, Deserialize)]
pub struct CreateIncident {
    pub title: String,
    pub description: Option<String>,
    pub severity: IncidentSeverity,
    pub status: Option<IncidentStatus>,
    pub created_by: DbId,
    pub assigned_to: Option<DbId>,
}

/// DTO for patching an incident. Assignment is changed through
/// `IncidentRepo::assign` / `IncidentRepo::unassign`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIncident {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<IncidentSeverity>,
    pub status: Option<IncidentStatus>,
}

/// Optional filters for listing incidents. `None` fields match everything.
#[derive(Debug, Default, Deserialize)]
pub struct IncidentFilter {
    pub status: Option<IncidentStatus>,
    pub severity: Option<IncidentSeverity>,
    pub assigned_to: Option<DbId>,
}
