//! Repository for the `alerts` table.

use incidentdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::alert::{Alert, CreateAlert};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, incident_id, \"type\", severity, message, metadata, \
                       acknowledged_at, acknowledged_by, created_at";

/// Provides create/read/acknowledge/delete operations for alerts.
pub struct AlertRepo;

impl AlertRepo {
    /// Insert a new alert, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateAlert) -> Result<Alert, sqlx::Error> {
        let query = format!(
            "INSERT INTO alerts (incident_id, \"type\", severity, message, metadata)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(input.incident_id)
            .bind(input.alert_type)
            .bind(input.severity)
            .bind(&input.message)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Find an alert by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM alerts WHERE id = $1");
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all alerts raised against an incident, newest first.
    pub async fn list_by_incident(
        pool: &PgPool,
        incident_id: DbId,
    ) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE incident_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(incident_id)
            .fetch_all(pool)
            .await
    }

    /// List every alert nobody has acknowledged yet, newest first.
    pub async fn list_unacknowledged(pool: &PgPool) -> Result<Vec<Alert>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alerts WHERE acknowledged_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Alert>(&query).fetch_all(pool).await
    }

    /// Mark an alert as acknowledged by `user_id`.
    ///
    /// Acknowledging twice keeps the first acknowledgement. Returns `None` if
    /// no row with the given `id` exists.
    pub async fn acknowledge(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Alert>, sqlx::Error> {
        let query = format!(
            "UPDATE alerts SET
                acknowledged_at = COALESCE(acknowledged_at, NOW()),
                acknowledged_by = CASE
                    WHEN acknowledged_at IS NULL THEN $2
                    ELSE acknowledged_by
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Alert>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an alert. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
