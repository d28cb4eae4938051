//! Checkout orchestration.
//!
//! A checkout attempt is single-shot and moves through
//! `Validating -> Submitting -> Succeeded | Failed`. Validation rejects in a
//! fixed order (user, cart, address, payment method) without touching any
//! state. Submission writes the order header, then the line items; if the
//! items fail, the header is deleted again as a best-effort compensating
//! action - the remote store offers no multi-statement transaction. If that
//! delete also fails, the orphaned header stays behind (logged, never
//! auto-healed).
//!
//! The cart is cleared only on full success.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use rust_decimal::Decimal;
use tracing::instrument;

use lojinha_core::{OrderId, OrderStatus, PaymentMethod, ShippingAddress};

use crate::db::RepositoryError;
use crate::models::{Cart, CurrentUser, NewOrder, NewOrderItem, Order};

/// Flat shipping fee charged on every order. There is no distance or weight
/// calculation.
#[must_use]
pub fn shipping_fee() -> Decimal {
    Decimal::new(1500, 2)
}

/// CEP: five digits, optional dash, three digits.
static CEP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}-?\d{3}$").expect("CEP pattern is valid"));

/// Errors that end a checkout attempt.
///
/// Display strings are for logs; [`CheckoutError::user_message`] carries the
/// Portuguese text shown to the customer.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// No logged-in user; the caller should redirect to login.
    #[error("checkout attempted without a logged-in user")]
    NotAuthenticated,

    /// The cart has no items.
    #[error("checkout attempted with an empty cart")]
    EmptyCart,

    /// A required shipping field is empty.
    #[error("shipping address is incomplete")]
    IncompleteAddress,

    /// The CEP does not match `NNNNN-NNN` / `NNNNNNNN`.
    #[error("shipping zip code is not a valid CEP")]
    InvalidZipCode,

    /// No (or no recognized) payment method.
    #[error("no payment method selected")]
    MissingPaymentMethod,

    /// Another attempt from this session is already in flight (advisory
    /// guard only; it cannot stop a second browser tab).
    #[error("a checkout attempt is already in flight")]
    AlreadyInFlight,

    /// The remote store rejected a write.
    #[error("store rejected checkout: {0}")]
    Store(#[from] RepositoryError),
}

impl CheckoutError {
    /// The user-facing rejection message. Remote failures collapse into one
    /// generic message; backend error text is never surfaced.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "Você precisa estar logado para finalizar a compra.",
            Self::EmptyCart => "Adicione produtos ao carrinho antes de finalizar a compra.",
            Self::IncompleteAddress => {
                "Por favor, preencha todos os campos obrigatórios do endereço."
            }
            Self::InvalidZipCode => "Por favor, insira um CEP válido (formato: 00000-000).",
            Self::MissingPaymentMethod => "Por favor, selecione uma forma de pagamento.",
            Self::AlreadyInFlight => "Seu pedido já está sendo processado.",
            Self::Store(_) => "Não foi possível processar seu pedido. Tente novamente.",
        }
    }
}

// =============================================================================
// Shipping form
// =============================================================================

/// Shipping form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShippingField {
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    ZipCode,
}

/// The shipping address as the customer fills it in.
///
/// [`ShippingForm::set`] enforces the per-field bounds the way the form does:
/// input beyond a field's bound is refused outright, leaving the stored value
/// untouched, rather than truncated later.
#[derive(Debug, Clone, Default)]
pub struct ShippingForm {
    street: String,
    number: String,
    complement: String,
    neighborhood: String,
    city: String,
    state: String,
    zip_code: String,
}

impl ShippingForm {
    const fn max_len(field: ShippingField) -> usize {
        match field {
            ShippingField::Street => ShippingAddress::MAX_STREET,
            ShippingField::Number => ShippingAddress::MAX_NUMBER,
            ShippingField::Complement => ShippingAddress::MAX_COMPLEMENT,
            ShippingField::Neighborhood => ShippingAddress::MAX_NEIGHBORHOOD,
            ShippingField::City => ShippingAddress::MAX_CITY,
            ShippingField::State => ShippingAddress::MAX_STATE,
            ShippingField::ZipCode => ShippingAddress::MAX_ZIP_CODE,
        }
    }

    /// Store a field value. Returns `false` (and stores nothing) when the
    /// value exceeds the field's bound.
    pub fn set(&mut self, field: ShippingField, value: &str) -> bool {
        if value.chars().count() > Self::max_len(field) {
            return false;
        }

        let slot = match field {
            ShippingField::Street => &mut self.street,
            ShippingField::Number => &mut self.number,
            ShippingField::Complement => &mut self.complement,
            ShippingField::Neighborhood => &mut self.neighborhood,
            ShippingField::City => &mut self.city,
            ShippingField::State => &mut self.state,
            ShippingField::ZipCode => &mut self.zip_code,
        };
        value.clone_into(slot);
        true
    }

    /// Validate the form: all required fields non-empty, CEP well-formed.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::IncompleteAddress` or
    /// `CheckoutError::InvalidZipCode`.
    pub fn validate(&self) -> Result<ShippingAddress, CheckoutError> {
        let required = [
            &self.street,
            &self.number,
            &self.neighborhood,
            &self.city,
            &self.state,
            &self.zip_code,
        ];
        if required.iter().any(|f| f.trim().is_empty()) {
            return Err(CheckoutError::IncompleteAddress);
        }

        if !CEP_PATTERN.is_match(&self.zip_code) {
            return Err(CheckoutError::InvalidZipCode);
        }

        Ok(ShippingAddress {
            street: self.street.clone(),
            number: self.number.clone(),
            complement: if self.complement.trim().is_empty() {
                None
            } else {
                Some(self.complement.clone())
            },
            neighborhood: self.neighborhood.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            zip_code: self.zip_code.clone(),
        })
    }
}

// =============================================================================
// Order store port
// =============================================================================

/// The three order writes checkout needs from the remote store.
///
/// Implemented by `db::OrderRepository` in production and by scripted fakes
/// in tests.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert the order header, returning the created row.
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError>;

    /// Insert all line items for an order.
    async fn insert_items(&self, items: &[NewOrderItem]) -> Result<(), RepositoryError>;

    /// Delete an order header (compensation path only).
    async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError>;
}

// =============================================================================
// Checkout service
// =============================================================================

/// Drives a single checkout attempt against an [`OrderStore`].
pub struct CheckoutService<'a, S: OrderStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: OrderStore + ?Sized> CheckoutService<'a, S> {
    /// Create a checkout service over the given store.
    #[must_use]
    pub const fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Run one checkout attempt.
    ///
    /// On success the cart is cleared and the created order returned. On any
    /// failure the cart is left untouched and the attempt ends in a
    /// user-facing rejection; the attempt is not resumable.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] describing the first precondition that
    /// failed, or the store error that ended submission.
    #[instrument(skip_all, fields(items = cart.item_count()))]
    pub async fn submit(
        &self,
        user: Option<&CurrentUser>,
        cart: &mut Cart,
        form: &ShippingForm,
        payment_method: Option<PaymentMethod>,
    ) -> Result<Order, CheckoutError> {
        // Validating: each check short-circuits without touching state
        let user = user.ok_or(CheckoutError::NotAuthenticated)?;

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let shipping_address = form.validate()?;

        let payment_method = payment_method.ok_or(CheckoutError::MissingPaymentMethod)?;

        // Submitting: header first, then items
        let new_order = NewOrder {
            user_id: user.id,
            total: cart.total(),
            shipping_fee: shipping_fee(),
            payment_method,
            shipping_address,
            status: OrderStatus::Placed,
        };

        let order = self.store.create_order(&new_order).await.map_err(|e| {
            tracing::error!(error = %e, "failed to create order header");
            CheckoutError::Store(e)
        })?;

        let items: Vec<NewOrderItem> = cart
            .items()
            .iter()
            .map(|item| NewOrderItem {
                order_id: order.id,
                product_id: item.product_id,
                // price captured from the cart line, not a fresh lookup
                quantity: item.quantity,
                price: item.price,
            })
            .collect();

        if let Err(e) = self.store.insert_items(&items).await {
            tracing::error!(
                error = %e,
                order_id = %order.id,
                "failed to create order items, deleting header"
            );

            if let Err(delete_err) = self.store.delete_order(order.id).await {
                // Best-effort compensation only: the orphaned header stays
                tracing::error!(
                    error = %delete_err,
                    order_id = %order.id,
                    "compensating delete failed, orphaned order header left behind"
                );
            }

            return Err(CheckoutError::Store(e));
        }

        // Succeeded
        cart.clear();
        tracing::info!(order_id = %order.id, total = %order.total, "order placed");

        Ok(order)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn filled_form() -> ShippingForm {
        let mut form = ShippingForm::default();
        assert!(form.set(ShippingField::Street, "Rua das Flores"));
        assert!(form.set(ShippingField::Number, "123"));
        assert!(form.set(ShippingField::Neighborhood, "Centro"));
        assert!(form.set(ShippingField::City, "São Paulo"));
        assert!(form.set(ShippingField::State, "SP"));
        assert!(form.set(ShippingField::ZipCode, "12345-678"));
        form
    }

    #[test]
    fn test_shipping_fee_is_fifteen() {
        assert_eq!(shipping_fee(), Decimal::new(1500, 2));
    }

    #[test]
    fn test_set_refuses_over_bound_values() {
        let mut form = filled_form();

        assert!(!form.set(ShippingField::Number, "12345678901")); // 11 > 10
        assert!(!form.set(ShippingField::State, "SPX")); // 3 > 2
        assert!(!form.set(ShippingField::ZipCode, "12345-67890")); // 11 > 9

        // Refused writes leave the previous values untouched
        let address = form.validate().unwrap();
        assert_eq!(address.number, "123");
        assert_eq!(address.state, "SP");
        assert_eq!(address.zip_code, "12345-678");
    }

    #[test]
    fn test_set_counts_characters_not_bytes() {
        let mut form = ShippingForm::default();
        // Two chars, more than two bytes
        assert!(form.set(ShippingField::State, "ÃO"));
    }

    #[test]
    fn test_validate_accepts_cep_with_and_without_dash() {
        let mut form = filled_form();

        form.set(ShippingField::ZipCode, "12345-678");
        assert!(form.validate().is_ok());

        form.set(ShippingField::ZipCode, "12345678");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_cep() {
        let mut form = filled_form();

        form.set(ShippingField::ZipCode, "1234-567");
        assert!(matches!(
            form.validate(),
            Err(CheckoutError::InvalidZipCode)
        ));

        form.set(ShippingField::ZipCode, "abcde-fgh");
        assert!(matches!(
            form.validate(),
            Err(CheckoutError::InvalidZipCode)
        ));
    }

    #[test]
    fn test_validate_requires_all_but_complement() {
        let mut form = filled_form();
        form.set(ShippingField::Neighborhood, "   ");
        assert!(matches!(
            form.validate(),
            Err(CheckoutError::IncompleteAddress)
        ));

        // complement stays optional
        let form = filled_form();
        let address = form.validate().unwrap();
        assert_eq!(address.complement, None);
    }

    #[test]
    fn test_validate_keeps_complement_when_present() {
        let mut form = filled_form();
        form.set(ShippingField::Complement, "Apto 42");
        let address = form.validate().unwrap();
        assert_eq!(address.complement.as_deref(), Some("Apto 42"));
    }
}
