//! Order repository.
//!
//! Covers both halves of the order lifecycle: the checkout writes (header +
//! items + compensating delete, exposed through the [`OrderStore`] port) and
//! the read/update surface used by the invoice, my-orders, and order
//! management views.

use async_trait::async_trait;
use serde_json::json;

use lojinha_core::{OrderId, OrderStatus, UserId};

use crate::models::{NewOrder, NewOrderItem, Order, OrderWithItems};
use crate::services::checkout::OrderStore;
use crate::supabase::RestClient;
use crate::supabase::rest::eq;

use super::RepositoryError;

const ORDERS: &str = "orders";
const ORDER_ITEMS: &str = "order_items";

/// Embedded select for the invoice view: header, items, product names.
const INVOICE_SELECT: &str = "*,order_items(*,products(name))";

/// Repository for the `orders` and `order_items` tables.
pub struct OrderRepository<'a> {
    rest: &'a RestClient,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// Fetch an order with its line items and product names.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = self
            .rest
            .select_one::<OrderWithItems>(
                ORDERS,
                &[eq("id", id), ("select", INVOICE_SELECT.to_owned())],
            )
            .await?;
        Ok(order)
    }

    /// List a customer's own orders, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders = self
            .rest
            .select::<Order>(
                ORDERS,
                &[eq("user_id", user_id), ("order", "created_at.desc".to_owned())],
            )
            .await?;
        Ok(orders)
    }

    /// List every order, newest first. Admin surface only.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = self
            .rest
            .select::<Order>(ORDERS, &[("order", "created_at.desc".to_owned())])
            .await?;
        Ok(orders)
    }

    /// Overwrite an order's status.
    ///
    /// Accepts any of the four produced statuses regardless of the current
    /// value; progression is not enforced. Authorization is the caller's
    /// responsibility.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the update fails.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<(), RepositoryError> {
        self.rest
            .update(ORDERS, &[eq("id", id)], &json!({ "status": status }))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for OrderRepository<'_> {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let created = self
            .rest
            .insert_returning::<Order, _>(ORDERS, order)
            .await?;
        Ok(created)
    }

    async fn insert_items(&self, items: &[NewOrderItem]) -> Result<(), RepositoryError> {
        self.rest.insert_many(ORDER_ITEMS, items).await?;
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError> {
        self.rest.delete(ORDERS, &[eq("id", id)]).await?;
        Ok(())
    }
}
