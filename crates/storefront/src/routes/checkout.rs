//! Checkout route handler.
//!
//! Thin adapter over [`CheckoutService`]: feeds the payload through the
//! bounded shipping form, runs the attempt against the order repository, and
//! persists the (possibly cleared) cart back to the session.
//!
//! A session flag disables checkout while an attempt is in flight. The flag
//! is advisory only - it is read and written non-atomically, so a second
//! browser tab can still double-submit.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use lojinha_core::{OrderId, PaymentMethod};

use crate::db::OrderRepository;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, session_keys};
use crate::services::checkout::{CheckoutError, CheckoutService, ShippingField, ShippingForm};
use crate::state::AppState;

use super::cart::{get_cart, save_cart};

/// Shipping address payload, camelCase like the stored blob.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShippingPayload {
    pub street: String,
    pub number: String,
    pub complement: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Checkout request body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub shipping: ShippingPayload,
    /// One of `credit_card`, `debit_card`, `pix`, `boleto`.
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Successful checkout response.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    /// Short human-facing reference ("Pedido #a1b2c3d4").
    pub reference: String,
    pub message: String,
}

/// Place the order.
#[instrument(skip(state, session, request))]
pub async fn submit(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let in_flight: bool = session
        .get(session_keys::CHECKOUT_IN_FLIGHT)
        .await
        .ok()
        .flatten()
        .unwrap_or(false);
    if in_flight {
        return Err(CheckoutError::AlreadyInFlight.into());
    }
    session
        .insert(session_keys::CHECKOUT_IN_FLIGHT, true)
        .await?;

    let result = run_checkout(&state, &user, &session, &request).await;

    // Lower the flag whatever happened; a failed attempt must stay retryable
    if let Err(e) = session
        .insert(session_keys::CHECKOUT_IN_FLIGHT, false)
        .await
    {
        tracing::warn!("Failed to clear checkout flag: {e}");
    }

    result.map(Json)
}

async fn run_checkout(
    state: &AppState,
    user: &CurrentUser,
    session: &Session,
    request: &CheckoutRequest,
) -> Result<CheckoutResponse> {
    let mut cart = get_cart(session).await;

    // Feed each field through the bounded form; over-long input is refused,
    // not truncated, leaving the field empty for validation to reject
    let mut form = ShippingForm::default();
    let fields = [
        (ShippingField::Street, request.shipping.street.as_str()),
        (ShippingField::Number, request.shipping.number.as_str()),
        (ShippingField::Complement, request.shipping.complement.as_str()),
        (
            ShippingField::Neighborhood,
            request.shipping.neighborhood.as_str(),
        ),
        (ShippingField::City, request.shipping.city.as_str()),
        (ShippingField::State, request.shipping.state.as_str()),
        (ShippingField::ZipCode, request.shipping.zip_code.as_str()),
    ];
    for (field, value) in fields {
        if !form.set(field, value) {
            tracing::debug!(?field, "refused over-bound shipping field");
        }
    }

    let payment_method = request
        .payment_method
        .as_deref()
        .and_then(|s| s.parse::<PaymentMethod>().ok());

    let repo = OrderRepository::new(state.rest());
    let service = CheckoutService::new(&repo);
    let order = service
        .submit(Some(user), &mut cart, &form, payment_method)
        .await?;

    // Success cleared the cart; persist that
    save_cart(session, &cart).await?;

    let reference = order.id.short();
    Ok(CheckoutResponse {
        order_id: order.id,
        message: format!("Seu pedido #{reference} foi processado."),
        reference,
    })
}
