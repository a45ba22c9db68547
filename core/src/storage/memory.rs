// storefront_core/src/storage/memory.rs

//! In-process store used by tests and local development.
//!
//! Transactions take the single store-wide async mutex for their whole
//! lifetime and mutate a staged copy of the data; `commit` swaps the
//! staged copy in, dropping the guard without committing discards it.
//! Holding the mutex across the transaction serializes concurrent
//! units of work, which stands in for Postgres row locking.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Address, Order, OrderItem, OrderStatus, Payment, PaymentStatus, Product, User};
use crate::storage::{OrderDetail, OrderFilter, OrderPage, OrderWithItems, Store, StoreTx};

#[derive(Debug, Clone, Default)]
struct MemoryInner {
  users: HashMap<Uuid, User>,
  addresses: HashMap<Uuid, Address>,
  products: HashMap<Uuid, Product>,
  orders: HashMap<Uuid, Order>,
  order_items: HashMap<Uuid, OrderItem>,
  payments: HashMap<Uuid, Payment>,
}

impl MemoryInner {
  fn items_for(&self, order_id: Uuid) -> Vec<OrderItem> {
    let mut items: Vec<OrderItem> = self
      .order_items
      .values()
      .filter(|item| item.order_id == order_id)
      .cloned()
      .collect();
    items.sort_by_key(|item| item.id);
    items
  }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<Mutex<MemoryInner>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub async fn seed_user(&self, user: User) {
    self.inner.lock().await.users.insert(user.id, user);
  }

  pub async fn seed_address(&self, address: Address) {
    self.inner.lock().await.addresses.insert(address.id, address);
  }

  pub async fn seed_product(&self, product: Product) {
    self.inner.lock().await.products.insert(product.id, product);
  }

  pub async fn get_order(&self, order_id: Uuid) -> Option<Order> {
    self.inner.lock().await.orders.get(&order_id).cloned()
  }

  pub async fn get_payment(&self, payment_id: Uuid) -> Option<Payment> {
    self.inner.lock().await.payments.get(&payment_id).cloned()
  }

  // Row counts, used by tests asserting full rollback.
  pub async fn order_count(&self) -> usize {
    self.inner.lock().await.orders.len()
  }

  pub async fn order_item_count(&self) -> usize {
    self.inner.lock().await.order_items.len()
  }

  pub async fn payment_count(&self) -> usize {
    self.inner.lock().await.payments.len()
  }
}

#[async_trait]
impl Store for MemoryStore {
  async fn begin(&self) -> Result<Box<dyn StoreTx>> {
    let guard = self.inner.clone().lock_owned().await;
    let staged = guard.clone();
    Ok(Box::new(MemoryTx { guard, staged }))
  }

  async fn order_detail(&self, order_id: Uuid) -> Result<Option<OrderDetail>> {
    let inner = self.inner.lock().await;
    let Some(order) = inner.orders.get(&order_id).cloned() else {
      return Ok(None);
    };
    let address = inner.addresses.get(&order.address_id).cloned();
    let items = inner.items_for(order_id);
    Ok(Some(OrderDetail { order, address, items }))
  }

  async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
    let inner = self.inner.lock().await;
    let mut orders: Vec<Order> = inner.orders.values().filter(|o| o.user_id == user_id).cloned().collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(
      orders
        .into_iter()
        .map(|order| {
          let items = inner.items_for(order.id);
          OrderWithItems { order, items }
        })
        .collect(),
    )
  }

  async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderPage> {
    let inner = self.inner.lock().await;
    let mut matching: Vec<Order> = inner
      .orders
      .values()
      .filter(|o| filter.status.map_or(true, |s| o.status == s))
      .filter(|o| filter.payment_method.map_or(true, |m| o.payment_method == m))
      .filter(|o| filter.created_from.map_or(true, |from| o.created_at >= from))
      .filter(|o| filter.created_to.map_or(true, |to| o.created_at <= to))
      .cloned()
      .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let total = matching.len() as u64;
    let orders = matching
      .into_iter()
      .skip(filter.offset() as usize)
      .take(filter.limit() as usize)
      .map(|order| {
        let items = inner.items_for(order.id);
        OrderWithItems { order, items }
      })
      .collect();
    Ok(OrderPage { total, orders })
  }

  async fn payments_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>> {
    let inner = self.inner.lock().await;
    let mut payments: Vec<Payment> = inner
      .payments
      .values()
      .filter(|p| p.order_id == order_id)
      .cloned()
      .collect();
    payments.sort_by_key(|p| p.created_at);
    Ok(payments)
  }
}

struct MemoryTx {
  guard: OwnedMutexGuard<MemoryInner>,
  staged: MemoryInner,
}

#[async_trait]
impl StoreTx for MemoryTx {
  async fn get_user(&mut self, user_id: Uuid) -> Result<Option<User>> {
    Ok(self.staged.users.get(&user_id).cloned())
  }

  async fn get_address(&mut self, address_id: Uuid) -> Result<Option<Address>> {
    Ok(self.staged.addresses.get(&address_id).cloned())
  }

  async fn get_product(&mut self, product_id: Uuid) -> Result<Option<Product>> {
    Ok(self.staged.products.get(&product_id).cloned())
  }

  async fn insert_order(&mut self, order: &Order) -> Result<()> {
    self.staged.orders.insert(order.id, order.clone());
    Ok(())
  }

  async fn insert_order_item(&mut self, item: &OrderItem) -> Result<()> {
    self.staged.order_items.insert(item.id, item.clone());
    Ok(())
  }

  async fn insert_payment(&mut self, payment: &Payment) -> Result<()> {
    self.staged.payments.insert(payment.id, payment.clone());
    Ok(())
  }

  async fn lock_order(&mut self, order_id: Uuid) -> Result<Option<Order>> {
    Ok(self.staged.orders.get(&order_id).cloned())
  }

  async fn update_order_status(&mut self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    if let Some(order) = self.staged.orders.get_mut(&order_id) {
      order.status = status;
      order.updated_at = Utc::now();
    }
    Ok(())
  }

  async fn lock_payment_by_txn(&mut self, transaction_id: &str) -> Result<Option<Payment>> {
    Ok(
      self
        .staged
        .payments
        .values()
        .find(|p| p.transaction_id.as_deref() == Some(transaction_id))
        .cloned(),
    )
  }

  async fn update_payment_status(&mut self, payment_id: Uuid, status: PaymentStatus) -> Result<()> {
    if let Some(payment) = self.staged.payments.get_mut(&payment_id) {
      payment.status = status;
      payment.updated_at = Utc::now();
    }
    Ok(())
  }

  async fn delete_order(&mut self, order_id: Uuid) -> Result<bool> {
    if self.staged.orders.remove(&order_id).is_none() {
      return Ok(false);
    }
    self.staged.order_items.retain(|_, item| item.order_id != order_id);
    self.staged.payments.retain(|_, payment| payment.order_id != order_id);
    Ok(true)
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    let MemoryTx { mut guard, staged } = *self;
    *guard = staged;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    // Dropping the staged copy is the rollback.
    Ok(())
  }
}
