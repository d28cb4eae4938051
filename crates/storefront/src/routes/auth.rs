//! Authentication route handlers.
//!
//! Login and registration delegate to the external auth provider through
//! [`AuthService`]; the session stores the resolved user. Logout is
//! local-first: the remote sign-out is best-effort and the session is
//! cleared no matter what.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_sessions::Session;
use tracing::instrument;

use lojinha_core::{Email, Role, UserId};

use crate::db::ProfileRepository;
use crate::error::Result;
use crate::middleware::{RequireAuth, clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::services::auth::AuthService;
use crate::services::auth_events::AuthEvent;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// The session user as returned to the client (no access token).
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

impl From<&CurrentUser> for UserResponse {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

fn auth_service<'a>(state: &'a AppState) -> AuthService<'a> {
    AuthService::new(
        state.auth(),
        ProfileRepository::new(state.rest()),
        &state.config().base_url,
    )
}

/// Handle login.
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>> {
    let user = auth_service(&state)
        .login(&request.email, &request.password)
        .await?;

    set_current_user(&session, &user).await?;

    state.publish_auth_event(AuthEvent::SignedIn {
        user_id: user.id,
        email: user.email.clone(),
    });

    Ok(Json(UserResponse::from(&user)))
}

/// Handle registration.
///
/// The provider sends a confirmation email; the account is not signed in
/// here.
#[instrument(skip(state, request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<Value>> {
    auth_service(&state)
        .register(&request.name, &request.email, &request.password)
        .await?;

    Ok(Json(json!({
        "message": "Cadastro realizado! Verifique seu email para confirmar a conta."
    })))
}

/// Handle logout.
///
/// The remote sign-out is best-effort; local session state is cleared even
/// when it fails, so the UI can never be left looking authenticated.
#[instrument(skip(state, session))]
pub async fn logout(State(state): State<AppState>, session: Session) -> Json<Value> {
    let user: Option<CurrentUser> = session
        .get(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten();

    if let Some(user) = &user {
        auth_service(&state).logout(&user.access_token).await;
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session user: {e}");
    }

    // Also destroy the entire session (cart included)
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {e}");
    }

    if let Some(user) = user {
        state.publish_auth_event(AuthEvent::SignedOut { user_id: user.id });
    }

    Json(json!({ "message": "Sessão encerrada." }))
}

/// Return the current session user.
pub async fn me(RequireAuth(user): RequireAuth) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}
