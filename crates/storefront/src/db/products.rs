//! Product repository.

use lojinha_core::ProductId;

use crate::models::{NewProduct, Product};
use crate::supabase::RestClient;
use crate::supabase::rest::eq;

use super::RepositoryError;

const TABLE: &str = "products";

/// Repository for the `products` table.
pub struct ProductRepository<'a> {
    rest: &'a RestClient,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// List active products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self
            .rest
            .select::<Product>(
                TABLE,
                &[eq("is_active", "true"), ("order", "created_at.desc".to_owned())],
            )
            .await?;
        Ok(products)
    }

    /// Get one active product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn get_active(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = self
            .rest
            .select_one::<Product>(TABLE, &[eq("id", id), eq("is_active", "true")])
            .await?;
        Ok(product)
    }

    /// Register a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let created = self
            .rest
            .insert_returning::<Product, _>(TABLE, product)
            .await?;
        Ok(created)
    }
}
