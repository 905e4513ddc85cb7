//! In-process identity provider.
//!
//! Keeps accounts in memory keyed by email and issues `mock_token_<id>`
//! access tokens. Call counters and failure switches let tests observe and
//! steer how the service talks to its provider.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::provider::{
    AuthOutcome, IdentityError, IdentityProvider, ProviderUser, Session, SignUpMetadata,
};

const TOKEN_PREFIX: &str = "mock_token_";

#[derive(Debug, Clone)]
struct Account {
    id: Uuid,
    email: String,
    password: String,
    metadata: serde_json::Value,
}

impl Account {
    fn user(&self) -> ProviderUser {
        ProviderUser {
            id: self.id,
            email: Some(self.email.clone()),
            user_metadata: self.metadata.clone(),
        }
    }

    fn session(&self) -> Session {
        Session {
            access_token: format!("{TOKEN_PREFIX}{}", self.id),
            refresh_token: None,
            expires_in: Some(3600),
        }
    }
}

#[derive(Debug, Default)]
struct Behaviour {
    /// When set, every sign-up is refused with this message.
    reject_sign_ups: Option<String>,
    /// When true, sign-up creates the account but opens no session.
    require_confirmation: bool,
}

/// Identity provider backed by a process-local account table.
#[derive(Debug, Default)]
pub struct InMemoryIdentityProvider {
    accounts: RwLock<HashMap<String, Account>>,
    behaviour: RwLock<Behaviour>,
    sign_up_calls: AtomicUsize,
    sign_in_calls: AtomicUsize,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account directly, bypassing `sign_up` and its counter.
    pub async fn seed_account(&self, id: Uuid, email: &str, password: &str) {
        let account = Account {
            id,
            email: email.to_string(),
            password: password.to_string(),
            metadata: serde_json::Value::Null,
        };
        self.accounts.write().await.insert(email.to_string(), account);
    }

    /// Refuse every subsequent sign-up with `message` (or stop refusing with `None`).
    pub async fn reject_sign_ups(&self, message: Option<&str>) {
        self.behaviour.write().await.reject_sign_ups = message.map(str::to_string);
    }

    /// Simulate a project that requires email confirmation before login.
    pub async fn require_confirmation(&self, required: bool) {
        self.behaviour.write().await.require_confirmation = required;
    }

    /// Whether an account exists for `email`.
    pub async fn has_account(&self, email: &str) -> bool {
        self.accounts.read().await.contains_key(email)
    }

    /// Number of `sign_up` calls received so far.
    pub fn sign_up_calls(&self) -> usize {
        self.sign_up_calls.load(Ordering::SeqCst)
    }

    /// Number of `sign_in_with_password` calls received so far.
    pub fn sign_in_calls(&self) -> usize {
        self.sign_in_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<AuthOutcome, IdentityError> {
        self.sign_up_calls.fetch_add(1, Ordering::SeqCst);

        let (reject, require_confirmation) = {
            let behaviour = self.behaviour.read().await;
            (
                behaviour.reject_sign_ups.clone(),
                behaviour.require_confirmation,
            )
        };
        if let Some(message) = reject {
            return Err(IdentityError::Rejected {
                status: 400,
                message,
            });
        }

        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(email) {
            return Err(IdentityError::Rejected {
                status: 422,
                message: "User already registered".into(),
            });
        }

        let metadata = serde_json::to_value(metadata)
            .map_err(|e| IdentityError::MalformedResponse(e.to_string()))?;
        let account = Account {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password: password.to_string(),
            metadata,
        };
        let outcome = AuthOutcome {
            user: Some(account.user()),
            session: (!require_confirmation).then(|| account.session()),
        };
        accounts.insert(email.to_string(), account);
        Ok(outcome)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, IdentityError> {
        self.sign_in_calls.fetch_add(1, Ordering::SeqCst);

        let accounts = self.accounts.read().await;
        match accounts.get(email) {
            Some(account) if account.password == password => Ok(AuthOutcome {
                user: Some(account.user()),
                session: Some(account.session()),
            }),
            _ => Err(IdentityError::Rejected {
                status: 400,
                message: "Invalid login credentials".into(),
            }),
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>, IdentityError> {
        let Some(id) = access_token
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|raw| Uuid::parse_str(raw).ok())
        else {
            return Ok(None);
        };

        let accounts = self.accounts.read().await;
        Ok(accounts.values().find(|a| a.id == id).map(Account::user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn metadata() -> SignUpMetadata {
        SignUpMetadata {
            full_name: "Alice A".into(),
            role: "viewer",
        }
    }

    #[tokio::test]
    async fn sign_up_then_sign_in_round_trip() {
        let provider = InMemoryIdentityProvider::new();

        let (user, session) = provider
            .sign_up("alice@example.com", "secret12", &metadata())
            .await
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(user.user_metadata["full_name"], "Alice A");

        let (again, login) = provider
            .sign_in_with_password("alice@example.com", "secret12")
            .await
            .unwrap()
            .into_parts()
            .unwrap();
        assert_eq!(again.id, user.id);
        assert_eq!(login.access_token, session.access_token);

        let resolved = provider.get_user(&session.access_token).await.unwrap();
        assert_eq!(resolved.map(|u| u.id), Some(user.id));
        assert_eq!(provider.sign_up_calls(), 1);
        assert_eq!(provider.sign_in_calls(), 1);
    }

    #[tokio::test]
    async fn duplicate_sign_up_is_rejected() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account(Uuid::new_v4(), "taken@example.com", "pw").await;

        let err = provider
            .sign_up("taken@example.com", "secret12", &metadata())
            .await
            .unwrap_err();
        assert_eq!(err.provider_message(), Some("User already registered"));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let provider = InMemoryIdentityProvider::new();
        provider.seed_account(Uuid::new_v4(), "bob@example.com", "right").await;

        let wrong = provider.sign_in_with_password("bob@example.com", "wrong").await;
        let unknown = provider.sign_in_with_password("nobody@example.com", "right").await;

        assert_matches!(wrong, Err(IdentityError::Rejected { status: 400, .. }));
        assert_matches!(unknown, Err(IdentityError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn unknown_tokens_resolve_to_none() {
        let provider = InMemoryIdentityProvider::new();
        assert!(provider.get_user("garbage").await.unwrap().is_none());
        let stale = format!("{TOKEN_PREFIX}{}", Uuid::new_v4());
        assert!(provider.get_user(&stale).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn confirmation_mode_returns_no_session() {
        let provider = InMemoryIdentityProvider::new();
        provider.require_confirmation(true).await;

        let outcome = provider
            .sign_up("pending@example.com", "secret12", &metadata())
            .await
            .unwrap();
        assert!(outcome.user.is_some());
        assert!(outcome.session.is_none());
        assert!(provider.has_account("pending@example.com").await);
    }

    #[tokio::test]
    async fn rejected_sign_ups_create_nothing() {
        let provider = InMemoryIdentityProvider::new();
        provider.reject_sign_ups(Some("Signups not allowed")).await;

        let err = provider
            .sign_up("new@example.com", "secret12", &metadata())
            .await
            .unwrap_err();
        assert_eq!(err.provider_message(), Some("Signups not allowed"));
        assert!(!provider.has_account("new@example.com").await);
    }
}
