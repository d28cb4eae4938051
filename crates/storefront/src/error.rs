//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`. Client-facing messages are Portuguese and generic:
//! raw backend error text never leaves the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::checkout::CheckoutError;
use crate::supabase::SupabaseError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Repository operation failed.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Supabase API operation failed.
    #[error("Supabase error: {0}")]
    Supabase(#[from] SupabaseError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Checkout attempt ended in a rejection or store failure.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Repository(_)
                | Self::Supabase(_)
                | Self::Session(_)
                | Self::Internal(_)
                | Self::Auth(AuthError::Upstream(_) | AuthError::Identity(_))
                | Self::Checkout(CheckoutError::Store(_))
        )
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Repository(RepositoryError::NotFound) | Self::NotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Repository(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::Supabase(_) => StatusCode::BAD_GATEWAY,
            // Every auth failure looks the same from outside
            Self::Auth(_) | Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Checkout(err) => match err {
                CheckoutError::NotAuthenticated => StatusCode::UNAUTHORIZED,
                CheckoutError::AlreadyInFlight => StatusCode::CONFLICT,
                CheckoutError::Store(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// The message sent to the client. Internal details stay in the logs.
    fn user_message(&self) -> String {
        match self {
            Self::Repository(RepositoryError::NotFound) => "Não encontrado.".to_owned(),
            Self::Repository(_) | Self::Session(_) | Self::Internal(_) => {
                "Erro interno do servidor.".to_owned()
            }
            Self::Supabase(_) => "Erro ao comunicar com o servidor. Tente novamente.".to_owned(),
            Self::Auth(_) => "Email ou senha incorretos".to_owned(),
            Self::Checkout(err) => err.user_message().to_owned(),
            Self::NotFound(msg) | Self::Unauthorized(msg) | Self::Forbidden(msg)
            | Self::BadRequest(msg) => msg.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = self.status();
        let body = Json(json!({ "error": self.user_message() }));

        (status, body).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("order-123".to_string());
        assert_eq!(err.to_string(), "Not found: order-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_auth_failures_are_indistinguishable() {
        let invalid = AppError::Auth(AuthError::InvalidCredentials);
        let input = AppError::Auth(AuthError::InvalidInput("email too long"));

        assert_eq!(invalid.user_message(), input.user_message());
        assert_eq!(invalid.user_message(), "Email ou senha incorretos");
        assert_eq!(get_status(AppError::Auth(AuthError::InvalidCredentials)), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_checkout_rejections_use_portuguese_messages() {
        let err = AppError::Checkout(CheckoutError::EmptyCart);
        assert_eq!(
            err.user_message(),
            "Adicione produtos ao carrinho antes de finalizar a compra."
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::AlreadyInFlight)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_store_errors_never_leak_details() {
        let err = AppError::Supabase(SupabaseError::Api {
            status: 500,
            message: "secret internal detail".to_string(),
        });
        assert!(!err.user_message().contains("secret internal detail"));
    }
}
