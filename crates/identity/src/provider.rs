//! The identity provider contract and its wire types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account as the identity provider reports it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderUser {
    /// Provider-issued identifier; mirrored as the local `users.id`.
    pub id: Uuid,
    pub email: Option<String>,
    /// Untyped metadata supplied at sign-up.
    #[serde(default)]
    pub user_metadata: serde_json::Value,
}

/// A session issued by the provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Result of a sign-up or sign-in call that the provider accepted.
///
/// Either half may be missing: a sign-up that still needs email
/// confirmation yields a user without a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthOutcome {
    pub user: Option<ProviderUser>,
    pub session: Option<Session>,
}

impl AuthOutcome {
    /// Both a user and a session, or `None`.
    pub fn into_parts(self) -> Option<(ProviderUser, Session)> {
        match (self.user, self.session) {
            (Some(user), Some(session)) => Some((user, session)),
            _ => None,
        }
    }
}

/// Metadata attached to a new account at sign-up.
///
/// The provider stores this as free-form JSON; `role` carries the label of
/// a local role value, never an arbitrary string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpMetadata {
    pub full_name: String,
    pub role: &'static str,
}

/// Errors from the identity provider layer.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("identity provider request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered and refused the operation.
    #[error("identity provider rejected the request ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Human-readable reason reported by the provider.
        message: String,
    },

    /// The provider answered with a body we could not interpret.
    #[error("malformed identity provider response: {0}")]
    MalformedResponse(String),
}

impl IdentityError {
    /// The provider's own explanation, when it gave one.
    pub fn provider_message(&self) -> Option<&str> {
        match self {
            IdentityError::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Operations the service needs from the external identity provider.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an account. Provider-side refusals (e.g. email already
    /// registered) are returned as [`IdentityError::Rejected`].
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<AuthOutcome, IdentityError>;

    /// Verify credentials and open a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, IdentityError>;

    /// Resolve an access token to its account.
    ///
    /// Returns `Ok(None)` when the provider does not recognise the token.
    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>, IdentityError>;
}
