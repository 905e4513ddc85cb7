use crate::validation::FieldError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// One or more request fields failed validation.
    #[error("Validation failed for {} field(s)", .0.len())]
    InvalidFields(Vec<FieldError>),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}
