//! Supabase API clients (GoTrue auth + PostgREST tables).
//!
//! # Architecture
//!
//! - Supabase is the source of truth - NO local database, direct API calls
//! - [`auth::AuthClient`] wraps the GoTrue endpoints used for login,
//!   registration, and sign-out
//! - [`rest::RestClient`] wraps the PostgREST endpoint the repositories in
//!   [`crate::db`] are built on
//!
//! Server-side requests authenticate with the service-role key; application
//! code is responsible for scoping reads to the calling user where the
//! contract requires it (e.g. customers only see their own orders).

pub mod auth;
pub mod rest;

pub use auth::AuthClient;
pub use rest::RestClient;

use thiserror::Error;

/// Errors that can occur when talking to Supabase.
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body snippet for logs; never shown to clients.
        message: String,
    },

    /// Credentials were rejected by the auth endpoint.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by Supabase.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl SupabaseError {
    /// Build an [`SupabaseError::Api`] from a response status and body,
    /// truncating the body so logs stay readable.
    pub(crate) fn from_response(status: reqwest::StatusCode, body: &str) -> Self {
        Self::Api {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        }
    }
}

/// Extract a `Retry-After` value in seconds, defaulting to 1.
pub(crate) fn retry_after_seconds(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(1)
}
