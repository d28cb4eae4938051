//! Cart algebra over longer operation sequences.
//!
//! The invariant under test: after any sequence of add / update / remove,
//! `total` equals the sum of price x quantity over surviving lines and
//! `item_count` equals the sum of quantities.

use rust_decimal::Decimal;

use lojinha_storefront::models::Cart;

use lojinha_integration_tests::product;

fn assert_invariants(cart: &Cart) {
    let expected_total: Decimal = cart
        .items()
        .iter()
        .map(|i| i.price * Decimal::from(i.quantity))
        .sum();
    let expected_count: u32 = cart.items().iter().map(|i| i.quantity).sum();

    assert_eq!(cart.total(), expected_total);
    assert_eq!(cart.item_count(), expected_count);
}

#[test]
fn invariants_hold_through_a_shopping_session() {
    let a = product("Notebook", Decimal::new(259_999, 2));
    let b = product("Mouse", Decimal::new(8990, 2));
    let c = product("Teclado", Decimal::new(29_999, 2));

    let mut cart = Cart::new();
    assert_invariants(&cart);

    cart.add(&a);
    assert_invariants(&cart);

    cart.add(&b);
    cart.add(&b);
    assert_invariants(&cart);

    cart.update_quantity(a.id, 2);
    assert_invariants(&cart);

    cart.add(&c);
    cart.remove(b.id);
    assert_invariants(&cart);

    cart.update_quantity(c.id, 10);
    assert_invariants(&cart);

    cart.update_quantity(a.id, 0); // removal via zero
    assert_invariants(&cart);

    assert_eq!(cart.items().len(), 1);
    assert_eq!(cart.total(), Decimal::new(299_990, 2));
}

#[test]
fn update_to_zero_and_remove_are_interchangeable() {
    let a = product("Monitor", Decimal::new(69_999, 2));
    let b = product("Webcam", Decimal::new(19_990, 2));

    let mut left = Cart::new();
    let mut right = Cart::new();
    for cart in [&mut left, &mut right] {
        cart.add(&a);
        cart.add(&b);
        cart.add(&b);
    }

    left.update_quantity(b.id, 0);
    right.remove(b.id);

    assert_eq!(left, right);
    assert_eq!(left.item_count(), 1);
}

#[test]
fn re_adding_a_removed_product_starts_fresh_at_quantity_one() {
    let a = product("Headset", Decimal::new(14_990, 2));

    let mut cart = Cart::new();
    cart.add(&a);
    cart.update_quantity(a.id, 7);
    cart.remove(a.id);
    cart.add(&a);

    assert_eq!(cart.item_count(), 1);
    assert_invariants(&cart);
}

#[test]
fn example_totals_from_the_contract() {
    // A(price=10, qty=2), B(price=5, qty=1): total = 25
    let a = product("A", Decimal::new(1000, 2));
    let b = product("B", Decimal::new(500, 2));

    let mut cart = Cart::new();
    cart.add(&a);
    cart.add(&a);
    cart.add(&b);

    assert_eq!(cart.total(), Decimal::new(2500, 2));
    assert_eq!(cart.item_count(), 3);
}
