//! Shared test fixtures for the Lojinha integration tests.
//!
//! The centerpiece is [`ScriptedOrderStore`], a recording in-memory
//! implementation of the checkout [`OrderStore`] port with per-operation
//! fault injection, used to exercise the order flow - including the
//! compensation path - without a live backend.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use lojinha_core::{Email, OrderId, OrderStatus, ProductId, Role, UserId};
use lojinha_storefront::db::RepositoryError;
use lojinha_storefront::models::{CurrentUser, NewOrder, NewOrderItem, Order, Product};
use lojinha_storefront::services::checkout::{OrderStore, ShippingField, ShippingForm};
use lojinha_storefront::supabase::SupabaseError;

/// Recording, fault-injectable order store.
#[derive(Default)]
pub struct ScriptedOrderStore {
    /// Make the next header insert fail.
    pub fail_create_order: AtomicBool,
    /// Make the next line-item insert fail.
    pub fail_insert_items: AtomicBool,
    /// Make the compensating delete fail too.
    pub fail_delete_order: AtomicBool,
    orders: Mutex<Vec<Order>>,
    items: Mutex<Vec<NewOrderItem>>,
    deleted: Mutex<Vec<OrderId>>,
}

impl ScriptedOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Orders still present in the store (created minus deleted).
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.orders.lock().expect("store lock").clone()
    }

    /// All line items ever inserted.
    #[must_use]
    pub fn items(&self) -> Vec<NewOrderItem> {
        self.items.lock().expect("store lock").clone()
    }

    /// Line items belonging to one order.
    #[must_use]
    pub fn items_for(&self, order_id: OrderId) -> Vec<NewOrderItem> {
        self.items()
            .into_iter()
            .filter(|i| i.order_id == order_id)
            .collect()
    }

    /// Ids passed to the compensating delete.
    #[must_use]
    pub fn deleted(&self) -> Vec<OrderId> {
        self.deleted.lock().expect("store lock").clone()
    }

    /// Find a surviving order by id.
    #[must_use]
    pub fn order_by_id(&self, id: OrderId) -> Option<Order> {
        self.orders().into_iter().find(|o| o.id == id)
    }

    /// A customer's surviving orders, the way the `user_id` filter scopes
    /// reads.
    #[must_use]
    pub fn orders_for(&self, user_id: UserId) -> Vec<Order> {
        self.orders()
            .into_iter()
            .filter(|o| o.user_id == user_id)
            .collect()
    }

    /// Overwrite an order's status, mirroring the repository semantics:
    /// a direct write with no transition validation.
    pub fn set_status(&self, id: OrderId, status: OrderStatus) {
        let mut orders = self.orders.lock().expect("store lock");
        if let Some(order) = orders.iter_mut().find(|o| o.id == id) {
            order.status = status.as_str().to_owned();
        }
    }

    fn injected_failure() -> RepositoryError {
        RepositoryError::Store(SupabaseError::Api {
            status: 500,
            message: "injected failure".to_owned(),
        })
    }
}

#[async_trait]
impl OrderStore for ScriptedOrderStore {
    async fn create_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        if self.fail_create_order.load(Ordering::SeqCst) {
            return Err(Self::injected_failure());
        }

        let created = Order {
            id: OrderId::generate(),
            user_id: order.user_id,
            total: order.total,
            shipping_fee: order.shipping_fee,
            payment_method: order.payment_method,
            shipping_address: order.shipping_address.clone(),
            status: order.status.as_str().to_owned(),
            created_at: Utc::now(),
        };
        self.orders.lock().expect("store lock").push(created.clone());
        Ok(created)
    }

    async fn insert_items(&self, items: &[NewOrderItem]) -> Result<(), RepositoryError> {
        if self.fail_insert_items.load(Ordering::SeqCst) {
            return Err(Self::injected_failure());
        }

        self.items.lock().expect("store lock").extend_from_slice(items);
        Ok(())
    }

    async fn delete_order(&self, id: OrderId) -> Result<(), RepositoryError> {
        if self.fail_delete_order.load(Ordering::SeqCst) {
            return Err(Self::injected_failure());
        }

        self.deleted.lock().expect("store lock").push(id);
        self.orders.lock().expect("store lock").retain(|o| o.id != id);
        Ok(())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// A catalog product priced in reais.
#[must_use]
pub fn product(name: &str, price: Decimal) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_owned(),
        description: format!("Descrição de {name}"),
        price,
        category: None,
        stock_quantity: 10,
        is_active: true,
        created_at: Utc::now(),
    }
}

/// A logged-in customer.
#[must_use]
pub fn customer() -> CurrentUser {
    user_with_role(Role::Customer)
}

/// A logged-in admin.
#[must_use]
pub fn admin() -> CurrentUser {
    user_with_role(Role::Admin)
}

fn user_with_role(role: Role) -> CurrentUser {
    let id = UserId::generate();
    CurrentUser {
        id,
        name: "Fulano".to_owned(),
        email: Email::parse(&format!("fulano+{}@example.com", id.short()))
            .expect("fixture email is valid"),
        role,
        access_token: "fixture-token".to_owned(),
    }
}

/// A complete, valid shipping form.
#[must_use]
pub fn valid_shipping_form() -> ShippingForm {
    shipping_form_with_cep("01310-100")
}

/// A complete shipping form with the given CEP.
#[must_use]
pub fn shipping_form_with_cep(cep: &str) -> ShippingForm {
    let mut form = ShippingForm::default();
    form.set(ShippingField::Street, "Avenida Paulista");
    form.set(ShippingField::Number, "1578");
    form.set(ShippingField::Complement, "Apto 42");
    form.set(ShippingField::Neighborhood, "Bela Vista");
    form.set(ShippingField::City, "São Paulo");
    form.set(ShippingField::State, "SP");
    form.set(ShippingField::ZipCode, cep);
    form
}
