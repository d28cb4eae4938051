//! Product domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lojinha_core::ProductId;

/// A row of the `products` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Non-negative unit price.
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    /// Captured at registration time; never checked or decremented at
    /// checkout.
    #[serde(default)]
    pub stock_quantity: i32,
    /// Products are soft-deactivated, never hard-deleted.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match on name or description, for the
    /// catalog search box.
    #[must_use]
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term)
            || self.description.to_lowercase().contains(&term)
    }
}

/// Insert shape for `products`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub stock_quantity: i32,
    pub is_active: bool,
}
