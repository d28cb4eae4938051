//! Session cart.
//!
//! The cart lives in the session, so it survives navigation within the app
//! but not across user sessions. Prices are captured into the line at add
//! time; checkout bills the captured price, not a fresh product lookup.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lojinha_core::ProductId;

use super::product::Product;

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price captured when the product was added.
    pub price: Decimal,
    /// Always >= 1; a line that would drop to zero is removed instead.
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// The cart state container.
///
/// Lines keep insertion order. There is deliberately no stock check here or
/// anywhere downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// The cart lines, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add one unit of `product`: increments the existing line, or appends a
    /// new line with quantity 1.
    pub fn add(&mut self, product: &Product) {
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product.id) {
            item.quantity += 1;
        } else {
            self.items.push(CartItem {
                product_id: product.id,
                name: product.name.clone(),
                description: product.description.clone(),
                price: product.price,
                quantity: 1,
            });
        }
    }

    /// Set the quantity of a line. A quantity of zero or less removes the
    /// line entirely. Unknown product ids are ignored.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if quantity <= 0 {
            self.remove(product_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|i| i.product_id == product_id) {
            item.quantity = quantity;
        }
    }

    /// Remove a line. Unknown product ids are ignored.
    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product_id != product_id);
    }

    /// Empty the cart. Called after a successful checkout.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price x quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: Decimal) -> Product {
        Product {
            id: ProductId::generate(),
            name: "Produto".to_owned(),
            description: "Descrição".to_owned(),
            price,
            category: None,
            stock_quantity: 0,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_new_product_starts_at_one() {
        let mut cart = Cart::new();
        let p = product(Decimal::new(1000, 2));

        cart.add(&p);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 1);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_add_existing_product_increments() {
        let mut cart = Cart::new();
        let p = product(Decimal::new(1000, 2));

        cart.add(&p);
        cart.add(&p);
        cart.add(&p);

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 3);
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut cart = Cart::new();
        let a = product(Decimal::ONE);
        let b = product(Decimal::TWO);
        let c = product(Decimal::TEN);

        cart.add(&a);
        cart.add(&b);
        cart.add(&c);
        cart.add(&a); // increment, must not reorder

        let ids: Vec<_> = cart.items().iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        // A(price=10, qty=2), B(price=5, qty=1) => total = 25
        let mut cart = Cart::new();
        let a = product(Decimal::new(1000, 2));
        let b = product(Decimal::new(500, 2));

        cart.add(&a);
        cart.add(&a);
        cart.add(&b);

        assert_eq!(cart.total(), Decimal::new(2500, 2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_update_quantity_sets_value() {
        let mut cart = Cart::new();
        let p = product(Decimal::new(750, 2));

        cart.add(&p);
        cart.update_quantity(p.id, 5);

        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.total(), Decimal::new(3750, 2));
    }

    #[test]
    fn test_update_quantity_zero_equals_remove() {
        let p = product(Decimal::new(750, 2));

        let mut via_update = Cart::new();
        via_update.add(&p);
        via_update.update_quantity(p.id, 0);

        let mut via_remove = Cart::new();
        via_remove.add(&p);
        via_remove.remove(p.id);

        assert_eq!(via_update, via_remove);
        assert!(via_update.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes() {
        let mut cart = Cart::new();
        let p = product(Decimal::ONE);

        cart.add(&p);
        cart.update_quantity(p.id, -3);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_update_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add(&product(Decimal::ONE));

        cart.update_quantity(ProductId::generate(), 4);

        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_clear_empties_cart() {
        let mut cart = Cart::new();
        cart.add(&product(Decimal::ONE));
        cart.add(&product(Decimal::TWO));

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_totals_hold_over_mixed_sequences() {
        let mut cart = Cart::new();
        let a = product(Decimal::new(1999, 2));
        let b = product(Decimal::new(250, 2));
        let c = product(Decimal::new(10_000, 2));

        cart.add(&a);
        cart.add(&b);
        cart.add(&b);
        cart.add(&c);
        cart.update_quantity(a.id, 3);
        cart.remove(c.id);
        cart.update_quantity(b.id, 0);

        // Only A(qty=3) survives
        let expected: Decimal = cart
            .items()
            .iter()
            .map(|i| i.price * Decimal::from(i.quantity))
            .sum();
        assert_eq!(cart.total(), expected);
        assert_eq!(cart.total(), Decimal::new(5997, 2));
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_price_captured_at_add_time() {
        let mut cart = Cart::new();
        let mut p = product(Decimal::new(1000, 2));

        cart.add(&p);
        p.price = Decimal::new(9999, 2); // later catalog change

        assert_eq!(cart.items()[0].price, Decimal::new(1000, 2));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cart = Cart::new();
        cart.add(&product(Decimal::new(1234, 2)));

        let json = serde_json::to_string(&cart).unwrap();
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
