//! Repository for the `tasks` table.

use incidentdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, incident_id, title, description, status, assigned_to, \
                       created_at, updated_at, completed_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// `status` falls back to the column default (`pending`) when `None`.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (incident_id, title, description, status, assigned_to, completed_at)
             VALUES ($1, $2, $3, COALESCE($4, 'pending'::task_status), $5,
                     CASE WHEN $4 = 'completed' THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.incident_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Find a task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all tasks for an incident in creation order.
    pub async fn list_by_incident(
        pool: &PgPool,
        incident_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tasks WHERE incident_id = $1 ORDER BY created_at ASC");
        sqlx::query_as::<_, Task>(&query)
            .bind(incident_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Entering `completed` stamps `completed_at`; leaving it clears the stamp.
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status = COALESCE($4, status),
                assigned_to = COALESCE($5, assigned_to),
                completed_at = CASE
                    WHEN $4 IS NULL THEN completed_at
                    WHEN $4 = 'completed' THEN COALESCE(completed_at, NOW())
                    ELSE NULL
                END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status)
            .bind(input.assigned_to)
            .fetch_optional(pool)
            .await
    }

    /// Clear the task's assignee. `update` cannot do this since `None` means
    /// "leave unchanged" there.
    pub async fn unassign(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query =
            format!("UPDATE tasks SET assigned_to = NULL WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a task together with its comments.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
