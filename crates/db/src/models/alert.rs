//! Alert entity model and DTOs.

use incidentdesk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::enums::{AlertSeverity, AlertType};

/// A row from the `alerts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub incident_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    /// Free-form structured payload supplied by the raiser.
    pub metadata: Option<serde_json::Value>,
    pub acknowledged_at: Option<Timestamp>,
    /// Set to NULL when the acknowledging user is deleted.
    pub acknowledged_by: Option<DbId>,
    pub created_at: Timestamp,
}

impl Alert {
    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged_at.is_some()
    }
}

/// DTO for raising a new alert.
#[derive(Debug, Deserialize)]
pub struct CreateAlert {
    pub incident_id: DbId,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub severity: AlertSeverity,
    pub message: String,
    pub metadata: Option<serde_json::Value>,
}
