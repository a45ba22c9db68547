// tests/common/mod.rs
#![allow(dead_code)] // Allow unused helpers in this common test module

use std::sync::Arc;

use chrono::Utc;
use tracing::Level;
use uuid::Uuid;

use storefront_core::lifecycle::{CheckoutItem, CheckoutOutcome, CheckoutRequest, OrderLifecycle, WebhookEvent};
use storefront_core::model::{Address, OrderStatus, PaymentMethod, Product, User};
use storefront_core::services::mocks::{MockGateway, MockNotifier};
use storefront_core::storage::memory::MemoryStore;
use storefront_core::storage::Store;

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

/// Everything a lifecycle test needs: a seeded in-memory store, the
/// scriptable collaborator doubles, and the lifecycle wired to them.
pub struct Harness {
  pub store: Arc<MemoryStore>,
  pub gateway: Arc<MockGateway>,
  pub notifier: Arc<MockNotifier>,
  pub lifecycle: OrderLifecycle,
  pub user: User,
  pub address: Address,
  pub product_a: Product,
  pub product_b: Product,
}

pub async fn harness() -> Harness {
  setup_tracing();

  let store = Arc::new(MemoryStore::new());
  let gateway = Arc::new(MockGateway::new());
  let notifier = Arc::new(MockNotifier::new());

  let user = User {
    id: Uuid::new_v4(),
    name: "Asha Rao".to_string(),
    email: "asha@example.test".to_string(),
  };
  let address = Address {
    id: Uuid::new_v4(),
    user_id: user.id,
    full_name: user.name.clone(),
    phone_no: "9876543210".to_string(),
    address_line: "12 Lake View Road".to_string(),
    city: "Pune".to_string(),
    state: "MH".to_string(),
    country: "IN".to_string(),
    postal_code: "411001".to_string(),
  };
  let product_a = Product {
    id: Uuid::new_v4(),
    name: "Steel Water Bottle".to_string(),
    price_cents: 100,
    stock: 50,
  };
  let product_b = Product {
    id: Uuid::new_v4(),
    name: "Canvas Tote".to_string(),
    price_cents: 250,
    stock: 20,
  };

  store.seed_user(user.clone()).await;
  store.seed_address(address.clone()).await;
  store.seed_product(product_a.clone()).await;
  store.seed_product(product_b.clone()).await;

  let lifecycle = OrderLifecycle::new(
    store.clone() as Arc<dyn Store>,
    gateway.clone(),
    notifier.clone(),
  );

  Harness {
    store,
    gateway,
    notifier,
    lifecycle,
    user,
    address,
    product_a,
    product_b,
  }
}

impl Harness {
  /// A well-formed COD request for `quantity` of product A.
  pub fn cod_request(&self, quantity: i32) -> CheckoutRequest {
    CheckoutRequest {
      user_id: self.user.id,
      address_id: self.address.id,
      items: vec![CheckoutItem {
        product_id: self.product_a.id,
        quantity,
        price_cents: self.product_a.price_cents,
      }],
      total_cents: self.product_a.price_cents * i64::from(quantity),
      payment_method: PaymentMethod::Cod,
      payer_name: None,
      payer_phone: None,
    }
  }

  pub fn gateway_request(&self) -> CheckoutRequest {
    CheckoutRequest {
      payment_method: PaymentMethod::Phonepe,
      payer_name: Some(self.user.name.clone()),
      payer_phone: Some("9876543210".to_string()),
      ..self.cod_request(1)
    }
  }

  pub async fn place_cod_order(&self) -> CheckoutOutcome {
    self.lifecycle.checkout(self.cod_request(1)).await.expect("COD checkout should succeed")
  }

  pub async fn place_gateway_order(&self) -> CheckoutOutcome {
    self
      .lifecycle
      .checkout(self.gateway_request())
      .await
      .expect("gateway checkout should succeed")
  }

  /// Drives a fresh order into `status` through real operations only:
  /// checkout, webhook confirmation, and admin transitions.
  pub async fn order_in_state(&self, status: OrderStatus) -> Uuid {
    match status {
      OrderStatus::Initiated => self.place_cod_order().await.order.id,
      OrderStatus::Paid => {
        let outcome = self.place_gateway_order().await;
        let txn = outcome.order.gateway_txn_id.clone().expect("gateway order has txn id");
        self
          .lifecycle
          .confirm_payment(WebhookEvent {
            transaction_id: txn,
            outcome: "success".parse().unwrap(),
          })
          .await
          .expect("confirmation should succeed");
        outcome.order.id
      }
      OrderStatus::PaymentFailed => {
        let outcome = self.place_gateway_order().await;
        let txn = outcome.order.gateway_txn_id.clone().expect("gateway order has txn id");
        self
          .lifecycle
          .confirm_payment(WebhookEvent {
            transaction_id: txn,
            outcome: "failed".parse().unwrap(),
          })
          .await
          .expect("confirmation should succeed");
        outcome.order.id
      }
      OrderStatus::Shipped => {
        let id = self.place_cod_order().await.order.id;
        self.lifecycle.transition_status(id, OrderStatus::Shipped).await.unwrap();
        id
      }
      OrderStatus::Delivered => {
        let id = self.place_cod_order().await.order.id;
        self.lifecycle.transition_status(id, OrderStatus::Delivered).await.unwrap();
        id
      }
      OrderStatus::Canceled => {
        let id = self.place_cod_order().await.order.id;
        self.lifecycle.transition_status(id, OrderStatus::Canceled).await.unwrap();
        id
      }
      OrderStatus::Return => {
        let id = self.place_cod_order().await.order.id;
        self.lifecycle.transition_status(id, OrderStatus::Delivered).await.unwrap();
        self.lifecycle.transition_status(id, OrderStatus::Return).await.unwrap();
        id
      }
    }
  }

  pub async fn status_of(&self, order_id: Uuid) -> OrderStatus {
    self
      .store
      .get_order(order_id)
      .await
      .expect("order should exist")
      .status
  }
}

/// Two checkouts created back to back can share a timestamp; nudge the
/// clock so newest-first ordering is deterministic.
pub async fn let_clock_tick() {
  let before = Utc::now();
  while Utc::now() == before {
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
  }
}
