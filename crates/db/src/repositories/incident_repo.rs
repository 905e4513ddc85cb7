//! Repository for the `incidents` table.

use incidentdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::incident::{CreateIncident, Incident, IncidentFilter, UpdateIncident};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, severity, status, created_by, assigned_to, \
                       created_at, updated_at, resolved_at";

/// Provides CRUD operations for incidents.
pub struct IncidentRepo;

impl IncidentRepo {
    /// Insert a new incident, returning the created row.
    ///
    /// `status` falls back to the column default (`open`) when `None`. An
    /// initial terminal status stamps `resolved_at` immediately.
    pub async fn create(pool: &PgPool, input: &CreateIncident) -> Result<Incident, sqlx::Error> {
        let query = format!(
            "INSERT INTO incidents (title, description, severity, status, created_by, assigned_to, resolved_at)
             VALUES ($1, $2, $3, COALESCE($4, 'open'::incident_status), $5, $6,
                     CASE WHEN $4 IN ('resolved', 'closed') THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.severity)
            .bind(input.status)
            .bind(input.created_by)
            .bind(input.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Find an incident by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM incidents WHERE id = $1");
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List incidents matching `filter`, newest first.
    pub async fn list(pool: &PgPool, filter: &IncidentFilter) -> Result<Vec<Incident>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM incidents
             WHERE ($1::incident_status IS NULL OR status = $1)
               AND ($2::incident_severity IS NULL OR severity = $2)
               AND ($3::uuid IS NULL OR assigned_to = $3)
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(filter.status)
            .bind(filter.severity)
            .bind(filter.assigned_to)
            .fetch_all(pool)
            .await
    }

    /// List incidents created by a given user, newest first.
    pub async fn list_by_creator(pool: &PgPool, user_id: DbId) -> Result<Vec<Incident>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM incidents WHERE created_by = $1 ORDER BY created_at DESC");
        sqlx::query_as::<_, Incident>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update an incident. Only non-`None` fields in `input` are applied.
    ///
    /// Moving into `resolved` or `closed` stamps `resolved_at` (keeping an
    /// existing stamp); moving back to `open` / `in_progress` clears it.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateIncident,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query = format!(
            "UPDATE incidents SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                severity = COALESCE($4, severity),
                status = COALESCE($5, status),
                resolved_at = CASE
                    WHEN $5 IS NULL THEN resolved_at
                    WHEN $5 IN ('resolved', 'closed') THEN COALESCE(resolved_at, NOW())
                    ELSE NULL
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.severity)
            .bind(input.status)
            .fetch_optional(pool)
            .await
    }

    /// Assign an incident to a user.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Incident>, sqlx::Error> {
        let query =
            format!("UPDATE incidents SET assigned_to = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear the assignee of an incident.
    pub async fn unassign(pool: &PgPool, id: DbId) -> Result<Option<Incident>, sqlx::Error> {
        let query =
            format!("UPDATE incidents SET assigned_to = NULL WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Incident>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an incident together with its tasks, comments and alerts.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM incidents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
