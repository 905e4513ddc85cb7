//! Request extractors with JSON error bodies.

use axum::extract::FromRequest;

use crate::error::AppError;

/// Drop-in replacement for [`axum::Json`] whose rejection is an [`AppError`].
///
/// Malformed or mistyped bodies become `400 {"message", "code"}` instead of
/// axum's plain-text 400/415/422 responses.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
