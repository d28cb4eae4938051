//! Order route handlers: my-orders, invoice, and the admin management
//! surface.
//!
//! Customers only ever see their own orders (`user_id` filter); admins see
//! all of them. The status update accepts any of the four produced values as
//! a direct overwrite - progression is deliberately not enforced.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lojinha_core::{OrderId, OrderStatus, ProductId, ShippingAddress};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAdmin, RequireAuth};
use crate::models::{Order, OrderWithItems};
use crate::state::AppState;

/// An order as shown in list views.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub reference: String,
    pub status: String,
    pub total: Decimal,
    pub shipping_fee: Decimal,
    pub grand_total: Decimal,
    pub payment_method: String,
    pub payment_method_label: String,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
}

impl From<&Order> for OrderSummary {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            reference: order.id.short(),
            status: order.status.clone(),
            total: order.total,
            shipping_fee: order.shipping_fee,
            grand_total: order.grand_total(),
            payment_method: order.payment_method.as_str().to_owned(),
            payment_method_label: order.payment_method.display_name().to_owned(),
            shipping_address: order.shipping_address.clone(),
            created_at: order.created_at,
        }
    }
}

/// One invoice line.
#[derive(Debug, Serialize)]
pub struct InvoiceItemView {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
}

/// The invoice view: header, lines, totals.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    pub id: OrderId,
    pub reference: String,
    pub status: String,
    pub payment_method_label: String,
    pub shipping_address: ShippingAddress,
    pub created_at: DateTime<Utc>,
    pub items: Vec<InvoiceItemView>,
    pub subtotal: Decimal,
    pub shipping_fee: Decimal,
    pub grand_total: Decimal,
}

impl From<&OrderWithItems> for InvoiceResponse {
    fn from(order: &OrderWithItems) -> Self {
        Self {
            id: order.order.id,
            reference: order.order.id.short(),
            status: order.order.status.clone(),
            payment_method_label: order.order.payment_method.display_name().to_owned(),
            shipping_address: order.order.shipping_address.clone(),
            created_at: order.order.created_at,
            items: order
                .order_items
                .iter()
                .map(|line| InvoiceItemView {
                    product_id: line.item.product_id,
                    name: line.products.name.clone(),
                    quantity: line.item.quantity,
                    unit_price: line.item.price,
                    line_total: line.line_total(),
                })
                .collect(),
            subtotal: order.order.total,
            shipping_fee: order.order.shipping_fee,
            grand_total: order.order.grand_total(),
        }
    }
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

/// Status update response.
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub id: OrderId,
    pub status: OrderStatus,
    pub message: String,
}

/// List the caller's orders, newest first.
#[instrument(skip(state, user))]
pub async fn list_mine(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderSummary>>> {
    let repo = OrderRepository::new(state.rest());
    let orders = repo.list_for_user(user.id).await?;
    Ok(Json(orders.iter().map(OrderSummary::from).collect()))
}

/// Fetch an invoice. Owner or admin only.
#[instrument(skip(state, user))]
pub async fn invoice(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(order_id): Path<OrderId>,
) -> Result<Json<InvoiceResponse>> {
    let repo = OrderRepository::new(state.rest());
    let order = repo
        .get_with_items(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Pedido não encontrado ou inválido.".to_owned()))?;

    if !order.order.viewable_by(&user) {
        return Err(AppError::Forbidden(
            "Você não tem permissão para visualizar esta fatura.".to_owned(),
        ));
    }

    Ok(Json(InvoiceResponse::from(&order)))
}

/// List every order, newest first (admin).
#[instrument(skip(state))]
pub async fn admin_list(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<OrderSummary>>> {
    let repo = OrderRepository::new(state.rest());
    let orders = repo.list_all().await?;
    Ok(Json(orders.iter().map(OrderSummary::from).collect()))
}

/// Overwrite an order's status (admin).
///
/// Any of the four produced statuses is accepted regardless of the current
/// one; two admins updating concurrently is last-write-wins.
#[instrument(skip(state, request))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(order_id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<UpdateStatusResponse>> {
    let status: OrderStatus = request
        .status
        .parse()
        .map_err(|_| AppError::BadRequest("Status inválido.".to_owned()))?;

    let repo = OrderRepository::new(state.rest());
    repo.update_status(order_id, status).await?;

    Ok(Json(UpdateStatusResponse {
        id: order_id,
        status,
        message: format!("Pedido #{} foi marcado como \"{status}\".", order_id.short()),
    }))
}
