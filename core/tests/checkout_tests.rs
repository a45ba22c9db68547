// tests/checkout_tests.rs
mod common;

use common::*;

use storefront_core::lifecycle::{CheckoutItem, CheckoutRequest};
use storefront_core::model::{OrderStatus, PaymentMethod, PaymentStatus};
use storefront_core::Error;
use uuid::Uuid;

#[tokio::test]
async fn cod_checkout_creates_order_items_and_pending_payment() {
  let h = harness().await;

  let request = CheckoutRequest {
    user_id: h.user.id,
    address_id: h.address.id,
    items: vec![CheckoutItem {
      product_id: h.product_a.id,
      quantity: 2,
      price_cents: 100,
    }],
    total_cents: 200,
    payment_method: PaymentMethod::Cod,
    payer_name: None,
    payer_phone: None,
  };

  let outcome = h.lifecycle.checkout(request).await.unwrap();

  assert_eq!(outcome.order.status, OrderStatus::Initiated);
  assert_eq!(outcome.order.total_cents, 200);
  assert!(outcome.order.gateway_txn_id.is_none());
  assert_eq!(outcome.items.len(), 1);
  assert_eq!(outcome.items[0].quantity, 2);
  assert_eq!(outcome.items[0].price_cents, 100);
  assert_eq!(outcome.payment.status, PaymentStatus::Pending);
  assert!(outcome.payment.transaction_id.is_none());
  assert!(outcome.redirect_url.is_none());

  assert_eq!(h.store.order_count().await, 1);
  assert_eq!(h.store.order_item_count().await, 1);
  assert_eq!(h.store.payment_count().await, 1);
}

#[tokio::test]
async fn cod_checkout_persists_one_item_row_per_line() {
  let h = harness().await;

  let request = CheckoutRequest {
    user_id: h.user.id,
    address_id: h.address.id,
    items: vec![
      CheckoutItem {
        product_id: h.product_a.id,
        quantity: 1,
        price_cents: 100,
      },
      CheckoutItem {
        product_id: h.product_b.id,
        quantity: 3,
        price_cents: 250,
      },
      CheckoutItem {
        product_id: h.product_a.id,
        quantity: 2,
        price_cents: 100,
      },
    ],
    total_cents: 100 + 750 + 200,
    payment_method: PaymentMethod::Cod,
    payer_name: None,
    payer_phone: None,
  };

  let outcome = h.lifecycle.checkout(request).await.unwrap();
  assert_eq!(outcome.items.len(), 3);
  assert_eq!(h.store.order_count().await, 1);
  assert_eq!(h.store.order_item_count().await, 3);
  assert_eq!(h.store.payment_count().await, 1);
}

#[tokio::test]
async fn checkout_rejects_empty_item_list() {
  let h = harness().await;
  let mut request = h.cod_request(1);
  request.items.clear();
  request.total_cents = 0;

  let err = h.lifecycle.checkout(request).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
  assert_eq!(h.store.order_count().await, 0);
}

#[tokio::test]
async fn checkout_rejects_non_positive_quantity() {
  let h = harness().await;
  let mut request = h.cod_request(1);
  request.items[0].quantity = 0;
  request.total_cents = 0;

  let err = h.lifecycle.checkout(request).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
}

#[tokio::test]
async fn checkout_rejects_total_mismatching_line_sums() {
  let h = harness().await;
  let mut request = h.cod_request(2);
  request.total_cents += 1;

  let err = h.lifecycle.checkout(request).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)), "got {:?}", err);
  assert_eq!(h.store.order_count().await, 0);
}

#[tokio::test]
async fn checkout_rejects_unknown_references() {
  let h = harness().await;

  let mut unknown_user = h.cod_request(1);
  unknown_user.user_id = Uuid::new_v4();
  assert!(matches!(h.lifecycle.checkout(unknown_user).await.unwrap_err(), Error::NotFound(_)));

  let mut unknown_address = h.cod_request(1);
  unknown_address.address_id = Uuid::new_v4();
  assert!(matches!(h.lifecycle.checkout(unknown_address).await.unwrap_err(), Error::NotFound(_)));

  let mut unknown_product = h.cod_request(1);
  unknown_product.items[0].product_id = Uuid::new_v4();
  assert!(matches!(h.lifecycle.checkout(unknown_product).await.unwrap_err(), Error::NotFound(_)));

  // Nothing from any failed attempt may stick.
  assert_eq!(h.store.order_count().await, 0);
  assert_eq!(h.store.order_item_count().await, 0);
  assert_eq!(h.store.payment_count().await, 0);
}

#[tokio::test]
async fn checkout_rejects_address_belonging_to_another_user() {
  let h = harness().await;
  let mut foreign = h.address.clone();
  foreign.id = Uuid::new_v4();
  foreign.user_id = Uuid::new_v4();
  h.store.seed_address(foreign.clone()).await;

  let mut request = h.cod_request(1);
  request.address_id = foreign.id;

  let err = h.lifecycle.checkout(request).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn gateway_initiation_failure_rolls_back_everything() {
  let h = harness().await;
  h.gateway.fail_with("provider unavailable");

  let err = h.lifecycle.checkout(h.gateway_request()).await.unwrap_err();
  assert!(matches!(err, Error::Gateway(_)), "got {:?}", err);

  assert_eq!(h.store.order_count().await, 0);
  assert_eq!(h.store.order_item_count().await, 0);
  assert_eq!(h.store.payment_count().await, 0);
  // The call was made; it just failed.
  assert_eq!(h.gateway.calls().len(), 1);
}

#[tokio::test]
async fn gateway_checkout_returns_redirect_and_initiated_payment() {
  let h = harness().await;
  h.gateway.succeed_with("https://pay.example.test/session/42");

  let outcome = h.lifecycle.checkout(h.gateway_request()).await.unwrap();

  assert_eq!(outcome.order.status, OrderStatus::Initiated);
  assert_eq!(outcome.payment.status, PaymentStatus::Initiated);
  let txn = outcome.order.gateway_txn_id.as_deref().unwrap();
  assert!(txn.starts_with("TXN_"));
  assert_eq!(outcome.payment.transaction_id.as_deref(), Some(txn));
  assert_eq!(outcome.redirect_url.as_deref(), Some("https://pay.example.test/session/42"));

  let calls = h.gateway.calls();
  assert_eq!(calls.len(), 1);
  assert_eq!(calls[0].transaction_id, txn);
  assert_eq!(calls[0].amount_cents, outcome.order.total_cents);
}

#[tokio::test]
async fn cod_checkout_notifies_the_buyer() {
  let h = harness().await;
  h.place_cod_order().await;

  let sent = h.notifier.sent();
  assert_eq!(sent.len(), 1);
  assert_eq!(sent[0].recipient, h.user.email);
  assert!(sent[0].subject.contains("Cash on Delivery"));
}

#[tokio::test]
async fn checkout_survives_a_failing_notifier() {
  let h = harness().await;
  h.notifier.fail_all();

  let outcome = h.lifecycle.checkout(h.cod_request(1)).await.unwrap();
  assert_eq!(outcome.order.status, OrderStatus::Initiated);
  assert_eq!(h.store.order_count().await, 1);
}

#[tokio::test]
async fn checkout_rejects_line_totals_that_overflow() {
  let h = harness().await;

  // A single line whose product * quantity does not fit in i64.
  let mut request = h.cod_request(1);
  request.items[0].quantity = 2;
  request.items[0].price_cents = i64::MAX;
  request.total_cents = i64::MAX;
  let err = h.lifecycle.checkout(request).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)), "got {:?}", err);

  // Lines that are individually fine but whose sum overflows.
  let mut request = h.cod_request(1);
  request.items = vec![
    CheckoutItem {
      product_id: h.product_a.id,
      quantity: 1,
      price_cents: i64::MAX,
    },
    CheckoutItem {
      product_id: h.product_b.id,
      quantity: 1,
      price_cents: i64::MAX,
    },
  ];
  request.total_cents = i64::MAX;
  let err = h.lifecycle.checkout(request).await.unwrap_err();
  assert!(matches!(err, Error::Validation(_)), "got {:?}", err);

  assert_eq!(h.store.order_count().await, 0);
  assert_eq!(h.store.order_item_count().await, 0);
  assert_eq!(h.store.payment_count().await, 0);
}
