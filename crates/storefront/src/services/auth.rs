//! Authentication service.
//!
//! Login and registration go to the external auth provider; this process
//! never sees a password hash. On a successful sign-in the provider identity
//! is joined with its `profiles` row. A missing profile is created once with
//! a name derived from the email local part; if even that single attempt
//! fails, an equivalent in-memory user is used without persisting anything.

use tracing::instrument;

use lojinha_core::{Email, Role, UserId};

use crate::db::ProfileRepository;
use crate::models::{CurrentUser, NewProfile};
use crate::supabase::auth::AuthSession;
use crate::supabase::{AuthClient, SupabaseError};

/// Maximum accepted password length (login and registration).
const MAX_PASSWORD_LENGTH: usize = 128;

/// Minimum password length at registration.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum display name length at registration.
const MAX_NAME_LENGTH: usize = 100;

/// Fallback display name when the email has no usable local part.
const FALLBACK_NAME: &str = "Usuário";

/// Authentication errors.
///
/// Variants exist for logs and tests; toward the client every one of them
/// collapses into the same rejection ("Email ou senha incorretos") so that
/// login and registration failures stay indistinguishable.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Input failed validation before any network call.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// The auth provider rejected the credentials or the signup.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The auth provider call failed.
    #[error("auth provider error: {0}")]
    Upstream(#[from] SupabaseError),

    /// The provider returned an identity this application cannot use.
    #[error("malformed identity data: {0}")]
    Identity(String),
}

/// Authentication service.
pub struct AuthService<'a> {
    auth: &'a AuthClient,
    profiles: ProfileRepository<'a>,
    base_url: &'a str,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(
        auth: &'a AuthClient,
        profiles: ProfileRepository<'a>,
        base_url: &'a str,
    ) -> Self {
        Self {
            auth,
            profiles,
            base_url,
        }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` when validation fails, the credentials are
    /// rejected, or the provider is unreachable.
    #[instrument(skip_all)]
    pub async fn login(&self, email: &str, password: &str) -> Result<CurrentUser, AuthError> {
        let email = email.trim().to_lowercase();

        if email.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput("email and password are required"));
        }
        if email.len() > Email::MAX_LENGTH {
            return Err(AuthError::InvalidInput("email too long"));
        }
        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput("password too long"));
        }

        let session = self
            .auth
            .sign_in_with_password(&email, password)
            .await
            .map_err(|e| match e {
                SupabaseError::InvalidCredentials => AuthError::InvalidCredentials,
                other => AuthError::Upstream(other),
            })?;

        self.resolve_user(&session).await
    }

    /// Register a new account.
    ///
    /// The provider sends the confirmation email; the user is not signed in
    /// here.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` when validation fails or the provider rejects
    /// the signup.
    #[instrument(skip_all)]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        let name = name.trim();

        if name.is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AuthError::InvalidInput("all fields are required"));
        }
        if name.len() > MAX_NAME_LENGTH {
            return Err(AuthError::InvalidInput("name too long"));
        }
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput("password too short"));
        }
        if password.len() > MAX_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput("password too long"));
        }

        let email = Email::parse(email).map_err(|_| AuthError::InvalidInput("invalid email"))?;

        let response = self
            .auth
            .sign_up(name, email.as_str(), password, self.base_url)
            .await
            .map_err(|e| match e {
                SupabaseError::InvalidCredentials => AuthError::InvalidCredentials,
                other => AuthError::Upstream(other),
            })?;

        if response.user.is_none() {
            return Err(AuthError::InvalidCredentials);
        }

        Ok(())
    }

    /// Revoke the session remotely, best-effort.
    ///
    /// Never fails: a remote error is logged and local state is cleared by
    /// the caller regardless, so the UI can't be left looking authenticated.
    #[instrument(skip_all)]
    pub async fn logout(&self, access_token: &str) {
        if let Err(e) = self.auth.sign_out(access_token).await {
            tracing::warn!(error = %e, "remote sign-out failed; clearing local session anyway");
        }
    }

    /// Join an auth session with its profile row.
    async fn resolve_user(&self, session: &AuthSession) -> Result<CurrentUser, AuthError> {
        let user_id = UserId::new(session.user.id);
        let raw_email = session.user.email.clone().unwrap_or_default();
        let email = Email::parse(&raw_email)
            .map_err(|e| AuthError::Identity(format!("unusable email from provider: {e}")))?;

        match self.profiles.get_by_id(user_id).await {
            Ok(Some(profile)) => Ok(CurrentUser {
                id: profile.id,
                name: profile.name,
                email: profile.email,
                role: profile.role,
                access_token: session.access_token.clone(),
            }),
            Ok(None) => Ok(self.create_profile_once(user_id, email, session).await),
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "profile fetch failed, using fallback user");
                Ok(fallback_user(user_id, email, session))
            }
        }
    }

    /// Create the missing profile. One attempt only - a failure falls back
    /// to an in-memory user carrying the same derived name and role.
    async fn create_profile_once(
        &self,
        user_id: UserId,
        email: Email,
        session: &AuthSession,
    ) -> CurrentUser {
        let new_profile = NewProfile {
            id: user_id,
            name: derived_name(&email),
            email: email.clone(),
            role: Role::Customer,
        };

        match self.profiles.create(&new_profile).await {
            Ok(profile) => CurrentUser {
                id: profile.id,
                name: profile.name,
                email: profile.email,
                role: profile.role,
                access_token: session.access_token.clone(),
            },
            Err(e) => {
                tracing::warn!(error = %e, user_id = %user_id, "profile creation failed, using fallback user");
                fallback_user(user_id, email, session)
            }
        }
    }
}

/// Display name derived from the email local part.
fn derived_name(email: &Email) -> String {
    let local = email.local_part();
    if local.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        local.to_owned()
    }
}

/// In-memory user for when the profile can neither be read nor created.
fn fallback_user(user_id: UserId, email: Email, session: &AuthSession) -> CurrentUser {
    CurrentUser {
        id: user_id,
        name: derived_name(&email),
        email,
        role: Role::Customer,
        access_token: session.access_token.clone(),
    }
}
