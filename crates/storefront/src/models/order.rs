//! Order domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lojinha_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, ShippingAddress, UserId};

use super::session::CurrentUser;

/// A row of the `orders` table (the order header).
///
/// `total` is the item subtotal; shipping is carried separately and the two
/// are only summed for display. `status` is stored as a free-form string -
/// the application only ever writes the four [`OrderStatus`] values, but
/// reads must not assume that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub total: Decimal,
    pub shipping_fee: Decimal,
    pub payment_method: PaymentMethod,
    /// JSON blob on the row, camelCase keys.
    pub shipping_address: ShippingAddress,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether `user` may read this order: the owner, or any admin.
    #[must_use]
    pub fn viewable_by(&self, user: &CurrentUser) -> bool {
        user.is_admin() || self.user_id == user.id
    }

    /// Subtotal plus shipping, as shown on the invoice.
    #[must_use]
    pub fn grand_total(&self) -> Decimal {
        self.total + self.shipping_fee
    }
}

/// Insert shape for `orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub total: Decimal,
    pub shipping_fee: Decimal,
    pub payment_method: PaymentMethod,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
}

/// A row of the `order_items` table.
///
/// `price` is the unit price captured at purchase time, decoupled from the
/// live product price. Rows are written once and never mutated; the only
/// delete path is checkout compensation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Insert shape for `order_items`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Reference to the product name, embedded by the invoice query
/// (`order_items(*,products(name))`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRef {
    pub name: String,
}

/// An order item joined with its product name for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub products: ProductRef,
}

impl InvoiceLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.item.price * Decimal::from(self.item.quantity)
    }
}

/// An order header with its embedded line items, as the invoice view
/// consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub order_items: Vec<InvoiceLine>,
}
