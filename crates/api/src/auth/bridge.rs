//! Register and login against the external identity provider.
//!
//! The provider owns credentials and sessions; the local `users` row mirrors
//! the provider's account under the same id. Registration is two-phase with
//! no compensation: if the provider accepts a sign-up and the local insert
//! then fails, the provider account is left without a local counterpart.

use incidentdesk_core::validation::{self, not_blank, FieldError};
use incidentdesk_db::models::enums::UserRole;
use incidentdesk_db::models::user::{CreateUser, User, UserResponse};
use incidentdesk_db::repositories::user_repo::EMAIL_UNIQUE_CONSTRAINT;
use incidentdesk_db::repositories::UserRepo;
use incidentdesk_db::DbPool;
use incidentdesk_identity::{IdentityError, IdentityProvider, SignUpMetadata};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::password::hash_password;

/// Reported when the provider refuses a sign-up without saying why.
pub const REGISTRATION_FAILED: &str = "Registration failed";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
///
/// Missing fields deserialize as empty strings so they surface as field
/// errors rather than as a body rejection.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Full name is required"))]
    pub full_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Successful register / login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    /// Access token issued by the identity provider.
    pub token: String,
}

/// Why a register or login attempt failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthFlowError {
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error("email already exists")]
    EmailTaken,

    /// Deliberately uninformative: covers unknown email, wrong password and
    /// a provider account with no local row.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The provider refused or failed the sign-up; the message is client-safe.
    #[error("identity provider: {0}")]
    Provider(String),

    #[error("password hashing: {0}")]
    Hashing(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// Bridge
// ---------------------------------------------------------------------------

/// Reconciles local users with provider accounts for one request.
pub struct IdentityBridge<'a> {
    pool: &'a DbPool,
    provider: &'a dyn IdentityProvider,
}

impl<'a> IdentityBridge<'a> {
    pub fn new(pool: &'a DbPool, provider: &'a dyn IdentityProvider) -> Self {
        Self { pool, provider }
    }

    /// Create a provider account and its local mirror.
    ///
    /// Steps, each short-circuiting: validate input, reject an email already
    /// present locally (before any provider call), sign up with the provider,
    /// hash the password, insert the local row under the provider's id.
    pub async fn register(&self, input: &RegisterRequest) -> Result<AuthResponse, AuthFlowError> {
        validate(input)?;

        if UserRepo::find_by_email(self.pool, &input.email)
            .await?
            .is_some()
        {
            tracing::info!(email = %input.email, "Registration rejected: email already exists");
            return Err(AuthFlowError::EmailTaken);
        }

        let role = UserRole::default();
        let metadata = SignUpMetadata {
            full_name: input.full_name.clone(),
            role: role.as_str(),
        };

        let outcome = self
            .provider
            .sign_up(&input.email, &input.password, &metadata)
            .await
            .map_err(|e| {
                tracing::warn!(email = %input.email, error = %e, "Identity provider sign-up failed");
                AuthFlowError::Provider(sign_up_failure_message(&e))
            })?;

        let Some((account, session)) = outcome.into_parts() else {
            tracing::warn!(email = %input.email, "Identity provider returned no session on sign-up");
            return Err(AuthFlowError::Provider(REGISTRATION_FAILED.into()));
        };

        let password_hash =
            hash_password(&input.password).map_err(|e| AuthFlowError::Hashing(e.to_string()))?;

        let new_user = CreateUser {
            id: account.id,
            email: input.email.clone(),
            password_hash,
            full_name: input.full_name.clone(),
            role,
        };

        let user = UserRepo::create(self.pool, &new_user).await.map_err(|e| {
            if is_email_conflict(&e) {
                tracing::info!(email = %input.email, "Lost registration race on email");
                AuthFlowError::EmailTaken
            } else {
                tracing::error!(
                    user_id = %account.id,
                    error = %e,
                    "Provider account created but local user insert failed"
                );
                AuthFlowError::Database(e)
            }
        })?;

        tracing::info!(user_id = %user.id, email = %user.email, "User registered");

        Ok(AuthResponse {
            user: UserResponse::from(&user),
            token: session.access_token,
        })
    }

    /// Sign in with the provider and return the matching local user.
    ///
    /// Any provider failure and a missing local row are reported identically.
    pub async fn login(&self, input: &LoginRequest) -> Result<AuthResponse, AuthFlowError> {
        validate(input)?;

        let outcome = self
            .provider
            .sign_in_with_password(&input.email, &input.password)
            .await
            .map_err(|e| {
                tracing::warn!(email = %input.email, error = %e, "Identity provider sign-in failed");
                AuthFlowError::InvalidCredentials
            })?;

        let Some((_, session)) = outcome.into_parts() else {
            tracing::warn!(email = %input.email, "Identity provider returned no session on sign-in");
            return Err(AuthFlowError::InvalidCredentials);
        };

        let user: User = UserRepo::find_by_email(self.pool, &input.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(email = %input.email, "Provider accepted login but no local user exists");
                AuthFlowError::InvalidCredentials
            })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            user: UserResponse::from(&user),
            token: session.access_token,
        })
    }
}

/// Whether `err` is a unique violation on the user email constraint.
pub fn is_email_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505")
                && db_err.constraint() == Some(EMAIL_UNIQUE_CONSTRAINT)
        }
        _ => false,
    }
}

fn validate<T: Validate>(input: &T) -> Result<(), AuthFlowError> {
    input
        .validate()
        .map_err(|errors| AuthFlowError::Validation(validation::field_errors(&errors)))
}

/// Client-facing message for a failed sign-up: the provider's own reason when
/// it gave one, otherwise the generic failure.
fn sign_up_failure_message(err: &IdentityError) -> String {
    err.provider_message()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or(REGISTRATION_FAILED)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn register(email: &str, password: &str, full_name: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: password.into(),
            full_name: full_name.into(),
        }
    }

    fn fields(err: AuthFlowError) -> Vec<(String, String)> {
        let AuthFlowError::Validation(errors) = err else {
            panic!("expected validation failure, got {err:?}");
        };
        errors.into_iter().map(|e| (e.field, e.message)).collect()
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate(&register("alice@example.com", "secret12", "Alice A")).is_ok());
    }

    #[test]
    fn registration_reports_every_bad_field() {
        let err = validate(&register("nope", "12345", "  ")).unwrap_err();
        assert_eq!(
            fields(err),
            vec![
                ("email".to_string(), "Invalid email format".to_string()),
                ("full_name".to_string(), "Full name is required".to_string()),
                (
                    "password".to_string(),
                    "Password must be at least 6 characters long".to_string()
                ),
            ]
        );
    }

    #[test]
    fn missing_fields_deserialize_to_empty_and_fail_validation() {
        let input: RegisterRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(fields(validate(&input).unwrap_err()).len(), 3);
    }

    #[test]
    fn login_requires_a_password() {
        let input = LoginRequest {
            email: "bob@example.com".into(),
            password: String::new(),
        };
        assert_eq!(
            fields(validate(&input).unwrap_err()),
            vec![("password".to_string(), "Password is required".to_string())]
        );
    }

    #[test]
    fn sign_up_failure_prefers_provider_message() {
        let rejected = IdentityError::Rejected {
            status: 422,
            message: "User already registered".into(),
        };
        assert_eq!(sign_up_failure_message(&rejected), "User already registered");

        let blank = IdentityError::Rejected {
            status: 500,
            message: " ".into(),
        };
        assert_eq!(sign_up_failure_message(&blank), REGISTRATION_FAILED);

        let malformed = IdentityError::MalformedResponse("user: bad id".into());
        assert_eq!(sign_up_failure_message(&malformed), REGISTRATION_FAILED);
    }

    #[test]
    fn non_database_errors_are_not_email_conflicts() {
        assert!(!is_email_conflict(&sqlx::Error::RowNotFound));
        assert_matches!(
            AuthFlowError::from(sqlx::Error::RowNotFound),
            AuthFlowError::Database(_)
        );
    }
}
