//! Cart route handlers.
//!
//! The cart lives in the session. Every mutation loads it, applies the
//! change, and writes it back; derived totals are recomputed per response.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use lojinha_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::{Cart, CartItem, session_keys};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

impl From<&CartItem> for CartItemView {
    fn from(item: &CartItem) -> Self {
        Self {
            product_id: item.product_id,
            name: item.name.clone(),
            description: item.description.clone(),
            price: item.price,
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// Cart display data with derived totals.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Decimal,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().iter().map(CartItemView::from).collect(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the session cart, defaulting to empty.
pub(crate) async fn get_cart(session: &Session) -> Cart {
    session
        .get::<Cart>(session_keys::CART)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}

/// Write the cart back to the session.
pub(crate) async fn save_cart(
    session: &Session,
    cart: &Cart,
) -> std::result::Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Update cart request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub quantity: i64,
}

/// Remove from cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
}

/// Cart count badge data.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display the cart.
#[instrument(skip(session))]
pub async fn show(RequireAuth(_user): RequireAuth, session: Session) -> Json<CartView> {
    let cart = get_cart(&session).await;
    Json(CartView::from(&cart))
}

/// Add one unit of a product to the cart.
///
/// The product must exist and be active; its current price is captured into
/// the cart line.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let repo = ProductRepository::new(state.rest());
    let product = repo
        .get_active(request.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Produto não encontrado.".to_owned()))?;

    let mut cart = get_cart(&session).await;
    cart.add(&product);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity; zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await;
    cart.update_quantity(request.product_id, request.quantity);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Remove a line from the cart.
#[instrument(skip(session))]
pub async fn remove(
    RequireAuth(_user): RequireAuth,
    session: Session,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await;
    cart.remove(request.product_id);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Result<Json<CartView>> {
    let mut cart = get_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// Item count badge.
#[instrument(skip(session))]
pub async fn count(RequireAuth(_user): RequireAuth, session: Session) -> Json<CartCount> {
    let cart = get_cart(&session).await;
    Json(CartCount {
        count: cart.item_count(),
    })
}
