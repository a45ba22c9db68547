// tests/order_query_tests.rs
mod common;

use common::*;

use storefront_core::model::{OrderStatus, PaymentMethod, PaymentStatus};
use storefront_core::storage::{OrderFilter, Store};
use storefront_core::Error;
use uuid::Uuid;

#[tokio::test]
async fn order_detail_includes_address_and_items() {
  let h = harness().await;
  let outcome = h.place_cod_order().await;

  let detail = h.lifecycle.order_detail(outcome.order.id).await.unwrap();
  assert_eq!(detail.order.id, outcome.order.id);
  assert_eq!(detail.items.len(), 1);
  let address = detail.address.expect("address row still present");
  assert_eq!(address.id, h.address.id);
  assert_eq!(address.city, "Pune");
}

#[tokio::test]
async fn order_detail_for_unknown_order_is_not_found() {
  let h = harness().await;
  let err = h.lifecycle.order_detail(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn user_orders_come_back_newest_first() {
  let h = harness().await;
  let first = h.place_cod_order().await;
  let_clock_tick().await;
  let second = h.place_cod_order().await;

  let orders = h.lifecycle.orders_for_user(h.user.id).await.unwrap();
  assert_eq!(orders.len(), 2);
  assert_eq!(orders[0].order.id, second.order.id);
  assert_eq!(orders[1].order.id, first.order.id);
  assert_eq!(orders[0].items.len(), 1);

  // A user with no orders gets an empty list, not an error.
  let none = h.lifecycle.orders_for_user(Uuid::new_v4()).await.unwrap();
  assert!(none.is_empty());
}

#[tokio::test]
async fn admin_listing_filters_by_status_and_method() {
  let h = harness().await;
  let cod = h.place_cod_order().await;
  let_clock_tick().await;
  let gateway = h.place_gateway_order().await;
  h.lifecycle
    .transition_status(cod.order.id, OrderStatus::Shipped)
    .await
    .unwrap();

  let shipped = h
    .lifecycle
    .list_orders(&OrderFilter {
      status: Some(OrderStatus::Shipped),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(shipped.total, 1);
  assert_eq!(shipped.orders[0].order.id, cod.order.id);

  let phonepe = h
    .lifecycle
    .list_orders(&OrderFilter {
      payment_method: Some(PaymentMethod::Phonepe),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(phonepe.total, 1);
  assert_eq!(phonepe.orders[0].order.id, gateway.order.id);

  let nothing = h
    .lifecycle
    .list_orders(&OrderFilter {
      status: Some(OrderStatus::Canceled),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(nothing.total, 0);
  assert!(nothing.orders.is_empty());
}

#[tokio::test]
async fn admin_listing_paginates_and_reports_total() {
  let h = harness().await;
  for _ in 0..5 {
    h.place_cod_order().await;
    let_clock_tick().await;
  }

  let page1 = h
    .lifecycle
    .list_orders(&OrderFilter {
      page: 1,
      limit: 2,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page1.total, 5);
  assert_eq!(page1.orders.len(), 2);

  let page3 = h
    .lifecycle
    .list_orders(&OrderFilter {
      page: 3,
      limit: 2,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page3.total, 5);
  assert_eq!(page3.orders.len(), 1);

  // Pages are disjoint and newest first across the whole listing.
  let all = h.lifecycle.list_orders(&OrderFilter::default()).await.unwrap();
  assert!(all
    .orders
    .windows(2)
    .all(|w| w[0].order.created_at >= w[1].order.created_at));
}

#[tokio::test]
async fn date_bounds_narrow_the_listing() {
  let h = harness().await;
  let early = h.place_cod_order().await;
  let_clock_tick().await;
  let cutoff = chrono::Utc::now();
  let_clock_tick().await;
  let late = h.place_cod_order().await;

  let before = h
    .lifecycle
    .list_orders(&OrderFilter {
      created_to: Some(cutoff),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(before.total, 1);
  assert_eq!(before.orders[0].order.id, early.order.id);

  let after = h
    .lifecycle
    .list_orders(&OrderFilter {
      created_from: Some(cutoff),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(after.total, 1);
  assert_eq!(after.orders[0].order.id, late.order.id);
}

#[tokio::test]
async fn deleting_an_order_cascades_to_items_and_payments() {
  let h = harness().await;
  let outcome = h.place_cod_order().await;
  assert_eq!(h.store.order_count().await, 1);

  h.lifecycle.delete_order(outcome.order.id).await.unwrap();

  assert_eq!(h.store.order_count().await, 0);
  assert_eq!(h.store.order_item_count().await, 0);
  assert_eq!(h.store.payment_count().await, 0);
}

#[tokio::test]
async fn deleting_an_unknown_order_is_not_found() {
  let h = harness().await;
  let err = h.lifecycle.delete_order(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn payments_for_order_lists_attempts() {
  let h = harness().await;
  let outcome = h.place_cod_order().await;

  let payments = h.lifecycle.payments_for_order(outcome.order.id).await.unwrap();
  assert_eq!(payments.len(), 1);
  assert_eq!(payments[0].status, PaymentStatus::Pending);
}

#[tokio::test]
async fn payments_for_order_without_payments_is_not_found() {
  let h = harness().await;
  let err = h.lifecycle.payments_for_order(Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)), "got {:?}", err);
}

#[tokio::test]
async fn uncommitted_transaction_work_is_invisible_after_drop() {
  let h = harness().await;

  {
    let mut tx = h.store.begin().await.unwrap();
    let user = tx.get_user(h.user.id).await.unwrap().unwrap();
    assert_eq!(user.email, h.user.email);
    // Dropped here without commit.
  }
  assert_eq!(h.store.order_count().await, 0);

  let outcome = h.place_cod_order().await;
  {
    let mut tx = h.store.begin().await.unwrap();
    assert!(tx.delete_order(outcome.order.id).await.unwrap());
    tx.rollback().await.unwrap();
  }
  // The rollback discarded the delete.
  assert_eq!(h.store.order_count().await, 1);
}

#[tokio::test]
async fn absurd_page_numbers_yield_an_empty_page() {
  let h = harness().await;
  h.place_cod_order().await;

  let page = h
    .lifecycle
    .list_orders(&OrderFilter {
      page: u32::MAX,
      limit: 100,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(page.total, 1);
  assert!(page.orders.is_empty());
}
