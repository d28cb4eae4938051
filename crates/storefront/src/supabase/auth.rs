//! GoTrue authentication client.
//!
//! Wraps the three auth endpoints this application consumes:
//! password grant, signup, and logout. Password verification itself happens
//! entirely on the Supabase side; this process never sees a hash.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::config::SupabaseConfig;

use super::{SupabaseError, retry_after_seconds};

/// The authenticated principal as GoTrue reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    /// Stable auth id; `profiles` rows are keyed by it.
    pub id: Uuid,
    /// Email may be absent for phone-only identities; this app always sets it.
    pub email: Option<String>,
}

/// A session issued by the password grant.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

/// Response of the signup endpoint.
///
/// With email confirmation enabled the session is absent until the user
/// clicks the link, so only the user is interesting here.
#[derive(Debug, Clone, Deserialize)]
pub struct SignUpResponse {
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Serialize)]
struct PasswordGrantRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Client for the Supabase GoTrue API.
#[derive(Clone)]
pub struct AuthClient {
    inner: Arc<AuthClientInner>,
}

struct AuthClientInner {
    client: reqwest::Client,
    endpoint: String,
    anon_key: String,
}

impl AuthClient {
    /// Create a new GoTrue client.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let endpoint = format!("{}/auth/v1", config.url);

        Self {
            inner: Arc::new(AuthClientInner {
                client: reqwest::Client::new(),
                endpoint,
                anon_key: config.anon_key.clone(),
            }),
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::InvalidCredentials` when the credentials are
    /// rejected, or another `SupabaseError` for transport/API failures.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!(
                "{}/token?grant_type=password",
                self.inner.endpoint
            ))
            .header("apikey", &self.inner.anon_key)
            .json(&PasswordGrantRequest { email, password })
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SupabaseError::RateLimited(retry_after_seconds(&response)));
        }

        // GoTrue answers bad credentials with 400/401/422 depending on the
        // failure; all of them collapse into the same user-facing rejection
        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(SupabaseError::InvalidCredentials);
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(status = %status, "GoTrue password grant failed");
            return Err(SupabaseError::from_response(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }

    /// Register a new identity with email, password, and a display name
    /// carried in the user metadata. The confirmation email links back to
    /// `email_redirect_to`.
    ///
    /// # Errors
    ///
    /// Returns `SupabaseError::InvalidCredentials` when signup is rejected
    /// (e.g. email already registered), or another `SupabaseError` for
    /// transport/API failures.
    #[instrument(skip(self, password, name), fields(email = %email))]
    pub async fn sign_up(
        &self,
        name: &str,
        email: &str,
        password: &str,
        email_redirect_to: &str,
    ) -> Result<SignUpResponse, SupabaseError> {
        let body = json!({
            "email": email,
            "password": password,
            "data": { "name": name },
        });

        let response = self
            .inner
            .client
            .post(format!("{}/signup", self.inner.endpoint))
            .query(&[("redirect_to", email_redirect_to)])
            .header("apikey", &self.inner.anon_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SupabaseError::RateLimited(retry_after_seconds(&response)));
        }

        if status == reqwest::StatusCode::BAD_REQUEST
            || status == reqwest::StatusCode::UNPROCESSABLE_ENTITY
        {
            // Deliberately indistinguishable from a bad login upstream
            return Err(SupabaseError::InvalidCredentials);
        }

        let text = response.text().await?;

        if !status.is_success() {
            tracing::error!(status = %status, "GoTrue signup failed");
            return Err(SupabaseError::from_response(status, &text));
        }

        Ok(serde_json::from_str(&text)?)
    }

    /// Revoke the given access token.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` when the call fails; callers treat this as
    /// best-effort and clear local state regardless.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .post(format!("{}/logout", self.inner.endpoint))
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SupabaseError::from_response(status, &body));
        }

        Ok(())
    }
}

impl std::fmt::Debug for AuthClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_session_deserializes_gotrue_shape() {
        let json = serde_json::json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": { "id": "a3bb189e-8bf9-3888-9912-ace4e6543002", "email": "user@example.com" }
        });

        let session: AuthSession = serde_json::from_value(json).unwrap();
        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.user.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn test_sign_up_response_without_session() {
        let json = serde_json::json!({
            "user": { "id": "a3bb189e-8bf9-3888-9912-ace4e6543002", "email": "new@example.com" },
            "session": null
        });

        let response: SignUpResponse = serde_json::from_value(json).unwrap();
        assert!(response.user.is_some());
    }
}
