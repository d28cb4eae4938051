//! Checkout flow scenarios against the scripted order store.
//!
//! Covers the full state machine: precondition rejections, the
//! compensation path on partial failure (including the orphan-header
//! limitation), and the success path through to a consistent invoice.

use rust_decimal::Decimal;
use std::sync::atomic::Ordering;

use lojinha_core::PaymentMethod;
use lojinha_storefront::models::Cart;
use lojinha_storefront::services::checkout::{
    CheckoutError, CheckoutService, ShippingForm, shipping_fee,
};

use lojinha_integration_tests::{
    ScriptedOrderStore, customer, product, shipping_form_with_cep, valid_shipping_form,
};

fn two_item_cart() -> Cart {
    // A(price=10, qty=2), B(price=5, qty=1) => subtotal 25
    let a = product("Produto A", Decimal::new(1000, 2));
    let b = product("Produto B", Decimal::new(500, 2));

    let mut cart = Cart::new();
    cart.add(&a);
    cart.add(&a);
    cart.add(&b);
    cart
}

#[tokio::test]
async fn successful_checkout_clears_cart_and_writes_consistent_invoice() {
    let store = ScriptedOrderStore::new();
    let user = customer();
    let mut cart = two_item_cart();
    let expected_lines: Vec<_> = cart
        .items()
        .iter()
        .map(|i| (i.product_id, i.quantity, i.price))
        .collect();

    let order = CheckoutService::new(&store)
        .submit(
            Some(&user),
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::Pix),
        )
        .await
        .expect("checkout should succeed");

    // Header is consistent with the cart at submission time
    assert_eq!(order.user_id, user.id);
    assert_eq!(order.total, Decimal::new(2500, 2));
    assert_eq!(order.shipping_fee, shipping_fee());
    assert_eq!(order.status, "Pedido Realizado");

    // Success clears the cart
    assert!(cart.is_empty());

    // The order id fetches an invoice with the same line items and totals
    let stored = store.order_by_id(order.id).expect("order persisted");
    assert_eq!(stored.total, Decimal::new(2500, 2));
    assert_eq!(stored.shipping_fee, Decimal::new(1500, 2));

    let items = store.items_for(order.id);
    let actual_lines: Vec<_> = items
        .iter()
        .map(|i| (i.product_id, i.quantity, i.price))
        .collect();
    assert_eq!(actual_lines, expected_lines);

    // Nothing was compensated
    assert!(store.deleted().is_empty());
}

#[tokio::test]
async fn checkout_without_user_is_rejected_before_any_write() {
    let store = ScriptedOrderStore::new();
    let mut cart = two_item_cart();

    let err = CheckoutService::new(&store)
        .submit(
            None,
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::Pix),
        )
        .await
        .expect_err("must reject");

    assert!(matches!(err, CheckoutError::NotAuthenticated));
    assert!(store.orders().is_empty());
    assert!(!cart.is_empty());
}

#[tokio::test]
async fn empty_cart_never_reaches_the_order_insert() {
    let store = ScriptedOrderStore::new();
    let user = customer();
    let mut cart = Cart::new();

    let err = CheckoutService::new(&store)
        .submit(
            Some(&user),
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::CreditCard),
        )
        .await
        .expect_err("must reject");

    assert!(matches!(err, CheckoutError::EmptyCart));
    assert!(store.orders().is_empty());
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn cep_is_accepted_with_and_without_dash() {
    for cep in ["12345678", "12345-678"] {
        let store = ScriptedOrderStore::new();
        let user = customer();
        let mut cart = two_item_cart();

        let result = CheckoutService::new(&store)
            .submit(
                Some(&user),
                &mut cart,
                &shipping_form_with_cep(cep),
                Some(PaymentMethod::Boleto),
            )
            .await;

        assert!(result.is_ok(), "CEP {cep} should pass validation");
    }
}

#[tokio::test]
async fn malformed_cep_is_rejected_without_any_write() {
    for cep in ["1234-567", "abcde-fgh"] {
        let store = ScriptedOrderStore::new();
        let user = customer();
        let mut cart = two_item_cart();

        let err = CheckoutService::new(&store)
            .submit(
                Some(&user),
                &mut cart,
                &shipping_form_with_cep(cep),
                Some(PaymentMethod::Boleto),
            )
            .await
            .expect_err("must reject");

        assert!(
            matches!(err, CheckoutError::InvalidZipCode),
            "CEP {cep} should fail validation"
        );
        assert!(store.orders().is_empty());
        assert!(!cart.is_empty());
    }
}

#[tokio::test]
async fn missing_payment_method_is_rejected_after_address_validation() {
    let store = ScriptedOrderStore::new();
    let user = customer();
    let mut cart = two_item_cart();

    let err = CheckoutService::new(&store)
        .submit(Some(&user), &mut cart, &valid_shipping_form(), None)
        .await
        .expect_err("must reject");

    assert!(matches!(err, CheckoutError::MissingPaymentMethod));
    assert!(store.orders().is_empty());
}

#[tokio::test]
async fn incomplete_address_is_checked_before_payment_method() {
    // Both address and payment are missing; the address rejection wins
    let store = ScriptedOrderStore::new();
    let user = customer();
    let mut cart = two_item_cart();

    let err = CheckoutService::new(&store)
        .submit(Some(&user), &mut cart, &ShippingForm::default(), None)
        .await
        .expect_err("must reject");

    assert!(matches!(err, CheckoutError::IncompleteAddress));
}

#[tokio::test]
async fn header_failure_leaves_cart_untouched() {
    let store = ScriptedOrderStore::new();
    store.fail_create_order.store(true, Ordering::SeqCst);

    let user = customer();
    let mut cart = two_item_cart();

    let err = CheckoutService::new(&store)
        .submit(
            Some(&user),
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::Pix),
        )
        .await
        .expect_err("must fail");

    assert!(matches!(err, CheckoutError::Store(_)));
    assert_eq!(cart.item_count(), 3);
    assert!(store.orders().is_empty());
    assert!(store.deleted().is_empty());
}

#[tokio::test]
async fn item_failure_compensates_by_deleting_the_header() {
    let store = ScriptedOrderStore::new();
    store.fail_insert_items.store(true, Ordering::SeqCst);

    let user = customer();
    let mut cart = two_item_cart();

    let err = CheckoutService::new(&store)
        .submit(
            Some(&user),
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::DebitCard),
        )
        .await
        .expect_err("must fail");

    assert!(matches!(err, CheckoutError::Store(_)));

    // The header that was created got deleted again
    assert_eq!(store.deleted().len(), 1);
    assert!(store.orders().is_empty());

    // And the cart is NOT cleared
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn failed_compensation_leaves_an_orphaned_header() {
    // Documented limitation: when both the item insert and the compensating
    // delete fail, the header stays behind and is never auto-healed
    let store = ScriptedOrderStore::new();
    store.fail_insert_items.store(true, Ordering::SeqCst);
    store.fail_delete_order.store(true, Ordering::SeqCst);

    let user = customer();
    let mut cart = two_item_cart();

    let err = CheckoutService::new(&store)
        .submit(
            Some(&user),
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::Pix),
        )
        .await
        .expect_err("must fail");

    assert!(matches!(err, CheckoutError::Store(_)));

    // Orphaned header remains, nothing was recorded as deleted
    assert_eq!(store.orders().len(), 1);
    assert!(store.items().is_empty());
    assert!(store.deleted().is_empty());

    // The user keeps their cart for a retry
    assert_eq!(cart.item_count(), 3);
}

#[tokio::test]
async fn line_items_capture_cart_prices_not_live_prices() {
    let store = ScriptedOrderStore::new();
    let user = customer();

    let mut listed = product("Produto", Decimal::new(1000, 2));
    let mut cart = Cart::new();
    cart.add(&listed);

    // Catalog price changes after the product went into the cart
    listed.price = Decimal::new(99_999, 2);

    let order = CheckoutService::new(&store)
        .submit(
            Some(&user),
            &mut cart,
            &valid_shipping_form(),
            Some(PaymentMethod::Pix),
        )
        .await
        .expect("checkout should succeed");

    let items = store.items_for(order.id);
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].price, Decimal::new(1000, 2));
}
