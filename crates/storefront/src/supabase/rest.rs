//! PostgREST table client.
//!
//! Thin typed wrapper over the `/rest/v1` endpoint. The repositories in
//! [`crate::db`] build on these primitives; nothing else should issue table
//! requests directly.
//!
//! PostgREST query conventions used here:
//! - filters are query parameters of the form `column=eq.value`
//! - `select` controls returned columns and embedded resources
//!   (e.g. `*,order_items(*,products(name))`)
//! - inserts return the created row(s) when `Prefer: return=representation`
//!   is set

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::config::SupabaseConfig;

use super::{SupabaseError, retry_after_seconds};

/// A filter/query parameter pair, e.g. `("user_id", "eq.<uuid>")`.
pub type QueryParam = (&'static str, String);

/// Convenience constructor for an equality filter.
#[must_use]
pub fn eq(column: &'static str, value: impl std::fmt::Display) -> QueryParam {
    (column, format!("eq.{value}"))
}

/// Client for the Supabase PostgREST API.
///
/// Requests authenticate with the service-role key; the key never leaves
/// this process.
#[derive(Clone)]
pub struct RestClient {
    inner: Arc<RestClientInner>,
}

struct RestClientInner {
    client: reqwest::Client,
    endpoint: String,
}

impl RestClient {
    /// Create a new PostgREST client.
    ///
    /// # Panics
    ///
    /// Panics if the service-role key contains invalid header characters.
    #[must_use]
    pub fn new(config: &SupabaseConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(config.service_role_key.expose_secret())
                .expect("Invalid service-role key for header"),
        );
        let mut bearer = HeaderValue::from_str(&format!(
            "Bearer {}",
            config.service_role_key.expose_secret()
        ))
        .expect("Invalid service-role key for header");
        bearer.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(RestClientInner {
                client,
                endpoint: format!("{}/rest/v1", config.url),
            }),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{table}", self.inner.endpoint)
    }

    /// Insert one row and return the created representation.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` if the request fails, the API rejects the
    /// row, or the response cannot be parsed.
    #[instrument(skip(self, row))]
    pub async fn insert_returning<T, B>(&self, table: &str, row: &B) -> Result<T, SupabaseError>
    where
        T: DeserializeOwned,
        B: Serialize + Sync,
    {
        let response = self
            .inner
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let body = Self::check(response).await?;

        // PostgREST always answers inserts with an array
        let mut rows: Vec<T> = serde_json::from_str(&body)?;
        rows.pop().ok_or_else(|| SupabaseError::Api {
            status: 200,
            message: format!("insert into {table} returned no rows"),
        })
    }

    /// Insert a batch of rows, discarding the representation.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` if the request fails or any row is rejected
    /// (PostgREST applies the batch atomically).
    #[instrument(skip(self, rows), fields(count = rows.len()))]
    pub async fn insert_many<B>(&self, table: &str, rows: &[B]) -> Result<(), SupabaseError>
    where
        B: Serialize + Sync,
    {
        let response = self
            .inner
            .client
            .post(self.table_url(table))
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await?;

        Self::check(response).await.map(drop)
    }

    /// Select rows matching the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` if the request fails or the response cannot
    /// be parsed.
    #[instrument(skip(self, query))]
    pub async fn select<T>(&self, table: &str, query: &[QueryParam]) -> Result<Vec<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .get(self.table_url(table))
            .query(query)
            .send()
            .await?;

        let body = Self::check(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Select at most one row matching the given query parameters.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` if the request fails or the response cannot
    /// be parsed.
    pub async fn select_one<T>(
        &self,
        table: &str,
        query: &[QueryParam],
    ) -> Result<Option<T>, SupabaseError>
    where
        T: DeserializeOwned,
    {
        let mut rows = self.select::<T>(table, query).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Patch rows matching the filters.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` if the request fails or the API rejects the
    /// patch.
    #[instrument(skip(self, filters, patch))]
    pub async fn update<B>(
        &self,
        table: &str,
        filters: &[QueryParam],
        patch: &B,
    ) -> Result<(), SupabaseError>
    where
        B: Serialize + Sync,
    {
        let response = self
            .inner
            .client
            .patch(self.table_url(table))
            .query(filters)
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;

        Self::check(response).await.map(drop)
    }

    /// Delete rows matching the filters.
    ///
    /// # Errors
    ///
    /// Returns a `SupabaseError` if the request fails or the API rejects the
    /// delete.
    #[instrument(skip(self, filters))]
    pub async fn delete(&self, table: &str, filters: &[QueryParam]) -> Result<(), SupabaseError> {
        let response = self
            .inner
            .client
            .delete(self.table_url(table))
            .query(filters)
            .send()
            .await?;

        Self::check(response).await.map(drop)
    }

    /// Map a response to its body, converting non-success statuses into
    /// typed errors.
    async fn check(response: reqwest::Response) -> Result<String, SupabaseError> {
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SupabaseError::RateLimited(retry_after_seconds(&response)));
        }

        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "PostgREST returned non-success status"
            );
            return Err(SupabaseError::from_response(status, &body));
        }

        Ok(body)
    }
}

impl std::fmt::Debug for RestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestClient")
            .field("endpoint", &self.inner.endpoint)
            .finish_non_exhaustive()
    }
}
