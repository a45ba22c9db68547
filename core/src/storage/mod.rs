// storefront_core/src/storage/mod.rs

//! Persistence abstraction for the order lifecycle.
//!
//! `Store` hands out read views and transactional units of work
//! (`StoreTx`). Every multi-row write in the lifecycle goes through a
//! `StoreTx`: commit makes all of it visible, dropping the transaction
//! without committing rolls all of it back. Two implementations ship:
//! [`PgStore`](postgres::PgStore) over sqlx/Postgres and
//! [`MemoryStore`](memory::MemoryStore) for tests and local runs.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Address, Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus, Product, User};

/// Filters and pagination for the admin order listing. All filters are
/// optional and composed with parameter binding, never string splicing.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
  pub status: Option<OrderStatus>,
  pub payment_method: Option<PaymentMethod>,
  pub created_from: Option<DateTime<Utc>>,
  pub created_to: Option<DateTime<Utc>>,
  pub page: u32,
  pub limit: u32,
}

impl OrderFilter {
  pub fn page(&self) -> u32 {
    self.page.max(1)
  }

  pub fn limit(&self) -> u32 {
    if self.limit == 0 {
      10
    } else {
      self.limit.min(100)
    }
  }

  pub fn offset(&self) -> u64 {
    // page comes straight from the query string; keep the math in u64
    // so an absurd page number cannot overflow.
    u64::from(self.page() - 1).saturating_mul(u64::from(self.limit()))
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrderPage {
  pub total: u64,
  pub orders: Vec<OrderWithItems>,
}

/// One order with its shipping address and line items. The address is
/// optional: the row may have been removed since the order was placed.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
  pub order: Order,
  pub address: Option<Address>,
  pub items: Vec<OrderItem>,
}

#[async_trait]
pub trait Store: Send + Sync {
  /// Starts a transactional unit of work.
  async fn begin(&self) -> Result<Box<dyn StoreTx>>;

  async fn order_detail(&self, order_id: Uuid) -> Result<Option<OrderDetail>>;

  /// A user's orders, newest first.
  async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>>;

  /// Admin listing: filtered, paginated, newest first, with total count.
  async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderPage>;

  async fn payments_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>>;
}

/// A single transactional unit of work.
///
/// Writes staged through a `StoreTx` become visible only on [`commit`].
/// Dropping the transaction without committing discards them, so every
/// early-return path rolls back for free. `lock_*` reads take a row
/// lock (or equivalent) so a read-validate-write sequence cannot race a
/// concurrent transaction on the same row.
///
/// [`commit`]: StoreTx::commit
#[async_trait]
pub trait StoreTx: Send {
  async fn get_user(&mut self, user_id: Uuid) -> Result<Option<User>>;
  async fn get_address(&mut self, address_id: Uuid) -> Result<Option<Address>>;
  async fn get_product(&mut self, product_id: Uuid) -> Result<Option<Product>>;

  async fn insert_order(&mut self, order: &Order) -> Result<()>;
  async fn insert_order_item(&mut self, item: &OrderItem) -> Result<()>;
  async fn insert_payment(&mut self, payment: &Payment) -> Result<()>;

  async fn lock_order(&mut self, order_id: Uuid) -> Result<Option<Order>>;
  async fn update_order_status(&mut self, order_id: Uuid, status: OrderStatus) -> Result<()>;

  async fn lock_payment_by_txn(&mut self, transaction_id: &str) -> Result<Option<Payment>>;
  async fn update_payment_status(&mut self, payment_id: Uuid, status: PaymentStatus) -> Result<()>;

  /// Deletes the order and, by cascade, its items and payments.
  /// Returns false when no such order exists.
  async fn delete_order(&mut self, order_id: Uuid) -> Result<bool>;

  async fn commit(self: Box<Self>) -> Result<()>;
  async fn rollback(self: Box<Self>) -> Result<()>;
}
