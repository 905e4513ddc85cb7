use std::any::Any;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use incidentdesk_core::error::CoreError;
use incidentdesk_core::validation::FieldError;
use incidentdesk_db::repositories::user_repo::EMAIL_UNIQUE_CONSTRAINT;
use serde_json::json;

use crate::auth::bridge::AuthFlowError;

/// Message returned for every 500; the cause is only logged.
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Message returned when an email is already registered locally.
pub const EMAIL_EXISTS_MESSAGE: &str = "Email already exists";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `incidentdesk_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    RequestTimeout,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<AuthFlowError> for AppError {
    fn from(err: AuthFlowError) -> Self {
        match err {
            AuthFlowError::Validation(errors) => AppError::Core(CoreError::InvalidFields(errors)),
            AuthFlowError::EmailTaken => AppError::BadRequest(EMAIL_EXISTS_MESSAGE.into()),
            AuthFlowError::InvalidCredentials => {
                AppError::Core(CoreError::Unauthorized("Invalid credentials".into()))
            }
            AuthFlowError::Provider(msg) => AppError::BadRequest(msg),
            AuthFlowError::Hashing(msg) => {
                AppError::InternalError(format!("Password hashing failed: {msg}"))
            }
            AuthFlowError::Database(err) => AppError::Database(err),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors: Option<&[FieldError]> = None;

        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::InvalidFields(fields) => {
                    errors = Some(fields.as_slice());
                    (
                        StatusCode::BAD_REQUEST,
                        "VALIDATION_ERROR",
                        "Validation failed".to_string(),
                    )
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::RequestTimeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "Request timed out".to_string(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = match errors {
            Some(fields) => json!({ "message": message, "code": code, "errors": fields }),
            None => json!({ "message": message, "code": code }),
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Panic handler for `CatchPanicLayer`: logs the payload and answers with
/// the same body as any other internal error.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "non-string panic payload"
    };
    AppError::InternalError(format!("Handler panicked: {detail}")).into_response()
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - A unique violation on the user email constraint maps to 400 "Email already exists".
/// - Foreign key (23503) and check (23514) violations map to 400.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            let constraint = db_err.constraint().unwrap_or("unknown");
            match db_err.code().as_deref() {
                Some("23505") if constraint == EMAIL_UNIQUE_CONSTRAINT => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "EMAIL_EXISTS",
                        EMAIL_EXISTS_MESSAGE.to_string(),
                    );
                }
                Some("23503") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "FOREIGN_KEY_VIOLATION",
                        format!("Referenced row does not exist: {constraint}"),
                    );
                }
                Some("23514") => {
                    return (
                        StatusCode::BAD_REQUEST,
                        "CHECK_VIOLATION",
                        format!("Value violates check constraint: {constraint}"),
                    );
                }
                _ => {}
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
