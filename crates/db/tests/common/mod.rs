//! Row fixtures shared by the repository integration tests.

#![allow(dead_code)]

use incidentdesk_db::models::enums::{IncidentSeverity, UserRole};
use incidentdesk_db::models::incident::{CreateIncident, Incident};
use incidentdesk_db::models::task::{CreateTask, Task};
use incidentdesk_db::models::user::{CreateUser, User};
use incidentdesk_db::repositories::{IncidentRepo, TaskRepo, UserRepo};
use sqlx::PgPool;
use uuid::Uuid;

pub fn new_user(email: &str) -> CreateUser {
    CreateUser {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$fixture$fixture".to_string(),
        full_name: format!("User {email}"),
        role: UserRole::Viewer,
    }
}

pub fn new_incident(created_by: Uuid, title: &str) -> CreateIncident {
    CreateIncident {
        title: title.to_string(),
        description: None,
        severity: IncidentSeverity::High,
        status: None,
        created_by,
        assigned_to: None,
    }
}

pub fn new_task(incident_id: Uuid, title: &str) -> CreateTask {
    CreateTask {
        incident_id,
        title: title.to_string(),
        description: None,
        status: None,
        assigned_to: None,
    }
}

pub async fn create_user(pool: &PgPool, email: &str) -> User {
    UserRepo::create(pool, &new_user(email))
        .await
        .expect("user creation should succeed")
}

pub async fn create_incident(pool: &PgPool, created_by: Uuid, title: &str) -> Incident {
    IncidentRepo::create(pool, &new_incident(created_by, title))
        .await
        .expect("incident creation should succeed")
}

pub async fn create_task(pool: &PgPool, incident_id: Uuid, title: &str) -> Task {
    TaskRepo::create(pool, &new_task(incident_id, title))
        .await
        .expect("task creation should succeed")
}

/// PostgreSQL SQLSTATE and constraint name of a failed write.
pub fn db_violation(err: &sqlx::Error) -> (String, Option<String>) {
    let db_err = err
        .as_database_error()
        .unwrap_or_else(|| panic!("expected a database error, got {err:?}"));
    (
        db_err.code().map(|c| c.into_owned()).unwrap_or_default(),
        db_err.constraint().map(str::to_string),
    )
}
