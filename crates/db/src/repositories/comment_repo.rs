//! Repository for the `comments` table.

use incidentdesk_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentTarget, CreateComment};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, incident_id, task_id, user_id, content, created_at, updated_at";

/// Check constraint enforcing the exactly-one-target rule.
pub const TARGET_CHECK_CONSTRAINT: &str = "ck_comments_target";

/// Provides CRUD operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a new comment, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let (incident_id, task_id) = input.target.columns();
        let query = format!(
            "INSERT INTO comments (incident_id, task_id, user_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(incident_id)
            .bind(task_id)
            .bind(input.user_id)
            .bind(&input.content)
            .fetch_one(pool)
            .await
    }

    /// Find a comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM comments WHERE id = $1");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List comments attached directly to an incident, oldest first.
    pub async fn list_for_incident(
        pool: &PgPool,
        incident_id: DbId,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM comments WHERE incident_id = $1 ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(incident_id)
            .fetch_all(pool)
            .await
    }

    /// List comments attached to a task, oldest first.
    pub async fn list_for_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Comment>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM comments WHERE task_id = $1 ORDER BY created_at ASC");
        sqlx::query_as::<_, Comment>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Replace the content of a comment.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content: &str,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let query = format!("UPDATE comments SET content = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(content)
            .fetch_optional(pool)
            .await
    }

    /// Move a comment to a different incident or task.
    pub async fn retarget(
        pool: &PgPool,
        id: DbId,
        target: CommentTarget,
    ) -> Result<Option<Comment>, sqlx::Error> {
        let (incident_id, task_id) = target.columns();
        let query = format!(
            "UPDATE comments SET incident_id = $2, task_id = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(id)
            .bind(incident_id)
            .bind(task_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a comment. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
