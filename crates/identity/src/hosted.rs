//! REST client for the hosted identity provider.
//!
//! Speaks the GoTrue-style `/auth/v1` API (sign-up, password grant, user
//! lookup) using [`reqwest`]. Every request carries the project API key in
//! the `apikey` header and is bounded by the client-level timeout.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};

use crate::provider::{
    AuthOutcome, IdentityError, IdentityProvider, ProviderUser, Session, SignUpMetadata,
};

/// HTTP client for one hosted identity project.
pub struct HostedIdentityClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HostedIdentityClient {
    /// Create a client for the project at `base_url`, e.g.
    /// `https://xyz.supabase.co`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, IdentityError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url, api_key))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.base_url)
    }

    // ---- private helpers ----

    /// Return the parsed JSON body of a 2xx response, or a
    /// [`IdentityError::Rejected`] carrying the provider's message.
    async fn json_body(response: reqwest::Response) -> Result<Value, IdentityError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IdentityError::Rejected {
                status: status.as_u16(),
                message: error_message(status, &body),
            });
        }
        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl IdentityProvider for HostedIdentityClient {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> Result<AuthOutcome, IdentityError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": metadata,
        });

        let response = self
            .client
            .post(self.endpoint("signup"))
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;

        parse_auth_payload(Self::json_body(response).await?)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, IdentityError> {
        let body = json!({ "email": email, "password": password });

        let response = self
            .client
            .post(self.endpoint("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.api_key)
            .json(&body)
            .send()
            .await?;

        parse_auth_payload(Self::json_body(response).await?)
    }

    async fn get_user(&self, access_token: &str) -> Result<Option<ProviderUser>, IdentityError> {
        let response = self
            .client
            .get(self.endpoint("user"))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if matches!(
            response.status(),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            tracing::debug!(status = %response.status(), "Identity provider rejected access token");
            return Ok(None);
        }

        let body = Self::json_body(response).await?;
        parse_user(body).map(Some)
    }
}

/// Interpret a sign-up / token response body.
///
/// The provider answers with a session envelope (`access_token` + `user`)
/// when a session was opened, or with the bare user object when sign-up
/// still awaits email confirmation.
pub(crate) fn parse_auth_payload(body: Value) -> Result<AuthOutcome, IdentityError> {
    if body.get("access_token").is_some() {
        let user = match body.get("user") {
            Some(Value::Null) | None => None,
            Some(user) => Some(parse_user(user.clone())?),
        };
        let session: Session = serde_json::from_value(body)
            .map_err(|e| IdentityError::MalformedResponse(format!("session: {e}")))?;
        return Ok(AuthOutcome {
            user,
            session: Some(session),
        });
    }

    if body.get("id").is_some() {
        return Ok(AuthOutcome {
            user: Some(parse_user(body)?),
            session: None,
        });
    }

    Ok(AuthOutcome::default())
}

fn parse_user(body: Value) -> Result<ProviderUser, IdentityError> {
    serde_json::from_value(body).map_err(|e| IdentityError::MalformedResponse(format!("user: {e}")))
}

/// Pull a human-readable reason out of an error body.
///
/// The provider is not consistent about the key it uses, so the known
/// candidates are tried in order before falling back to the status text.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            ["msg", "message", "error_description", "error"]
                .iter()
                .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("identity provider error")
                .to_string()
        })
}
