//! Table repositories over the PostgREST client.
//!
//! # Tables
//!
//! - `profiles` - display name + role per auth identity
//! - `products` - catalog (soft-deactivated via `is_active`)
//! - `orders` / `order_items` - order headers and captured line items
//! - `expenses` - admin expense ledger
//!
//! Each repository borrows the shared [`RestClient`] and returns domain
//! types from [`crate::models`].

pub mod expenses;
pub mod orders;
pub mod products;
pub mod profiles;

use thiserror::Error;

pub use expenses::ExpenseRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use profiles::ProfileRepository;

use crate::supabase::SupabaseError;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Remote store error.
    #[error("store error: {0}")]
    Store(#[from] SupabaseError),

    /// Data in the store is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate profile).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a Supabase error, turning the PostgREST duplicate-key status
    /// (409) into a [`RepositoryError::Conflict`].
    pub(crate) fn from_store(err: SupabaseError, conflict_message: &str) -> Self {
        match err {
            SupabaseError::Api { status: 409, .. } => Self::Conflict(conflict_message.to_owned()),
            other => Self::Store(other),
        }
    }
}
