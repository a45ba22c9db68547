// storefront_core/src/storage/postgres.rs

//! Postgres-backed store over sqlx.
//!
//! Each `StoreTx` wraps one `sqlx::Transaction`; sqlx rolls the
//! transaction back when it is dropped without an explicit commit, so
//! every early-return path in the lifecycle leaves nothing behind.
//! `lock_*` reads use `SELECT ... FOR UPDATE` so a read-validate-write
//! sequence holds the row until commit.

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder, Transaction};
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Address, Order, OrderItem, OrderStatus, Payment, PaymentStatus, Product, User};
use crate::storage::{OrderDetail, OrderFilter, OrderPage, OrderWithItems, Store, StoreTx};

#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn connect(database_url: &str) -> Result<Self> {
    let pool = PgPoolOptions::new().max_connections(10).connect(database_url).await?;
    Ok(Self { pool })
  }

  pub async fn migrate(&self) -> Result<()> {
    sqlx::migrate!("./migrations")
      .run(&self.pool)
      .await
      .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;
    Ok(())
  }

  pub fn pool(&self) -> &PgPool {
    &self.pool
  }

  async fn items_for_orders(&self, order_ids: &[Uuid]) -> Result<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
      "SELECT id, order_id, product_id, quantity, price_cents
       FROM order_items WHERE order_id = ANY($1) ORDER BY id",
    )
    .bind(order_ids)
    .fetch_all(&self.pool)
    .await?;
    Ok(items)
  }

  fn attach_items(orders: Vec<Order>, mut items: Vec<OrderItem>) -> Vec<OrderWithItems> {
    orders
      .into_iter()
      .map(|order| {
        let (mine, rest): (Vec<_>, Vec<_>) = items.drain(..).partition(|item| item.order_id == order.id);
        items = rest;
        OrderWithItems { order, items: mine }
      })
      .collect()
  }
}

const ORDER_COLUMNS: &str =
  "id, user_id, address_id, total_cents, payment_method, status, gateway_txn_id, created_at, updated_at";

const PAYMENT_COLUMNS: &str = "id, order_id, transaction_id, method, status, created_at, updated_at";

fn push_order_filters(builder: &mut QueryBuilder<'_, Postgres>, filter: &OrderFilter) {
  let mut prefix = " WHERE ";
  if let Some(status) = filter.status {
    builder.push(prefix).push("status = ").push_bind(status);
    prefix = " AND ";
  }
  if let Some(method) = filter.payment_method {
    builder.push(prefix).push("payment_method = ").push_bind(method);
    prefix = " AND ";
  }
  if let Some(from) = filter.created_from {
    builder.push(prefix).push("created_at >= ").push_bind(from);
    prefix = " AND ";
  }
  if let Some(to) = filter.created_to {
    builder.push(prefix).push("created_at <= ").push_bind(to);
  }
}

#[async_trait]
impl Store for PgStore {
  async fn begin(&self) -> Result<Box<dyn StoreTx>> {
    let tx = self.pool.begin().await?;
    Ok(Box::new(PgTx { tx }))
  }

  async fn order_detail(&self, order_id: Uuid) -> Result<Option<OrderDetail>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
      .bind(order_id)
      .fetch_optional(&self.pool)
      .await?;
    let Some(order) = order else {
      return Ok(None);
    };

    let address = sqlx::query_as::<_, Address>(
      "SELECT id, user_id, full_name, phone_no, address_line, city, state, country, postal_code
       FROM addresses WHERE id = $1",
    )
    .bind(order.address_id)
    .fetch_optional(&self.pool)
    .await?;

    let items = self.items_for_orders(&[order_id]).await?;
    Ok(Some(OrderDetail { order, address, items }))
  }

  async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
    let orders = sqlx::query_as::<_, Order>(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = self.items_for_orders(&ids).await?;
    Ok(Self::attach_items(orders, items))
  }

  async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderPage> {
    let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_order_filters(&mut count_query, filter);
    let total: i64 = count_query.build_query_scalar().fetch_one(&self.pool).await?;

    let mut page_query = QueryBuilder::new(format!("SELECT {ORDER_COLUMNS} FROM orders"));
    push_order_filters(&mut page_query, filter);
    page_query
      .push(" ORDER BY created_at DESC LIMIT ")
      .push_bind(filter.limit() as i64)
      .push(" OFFSET ")
      .push_bind(filter.offset() as i64);
    let orders: Vec<Order> = page_query.build_query_as().fetch_all(&self.pool).await?;

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let items = self.items_for_orders(&ids).await?;
    Ok(OrderPage {
      total: total as u64,
      orders: Self::attach_items(orders, items),
    })
  }

  async fn payments_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>> {
    let payments = sqlx::query_as::<_, Payment>(&format!(
      "SELECT {PAYMENT_COLUMNS} FROM payments WHERE order_id = $1 ORDER BY created_at"
    ))
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(payments)
  }
}

struct PgTx {
  tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PgTx {
  async fn get_user(&mut self, user_id: Uuid) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>("SELECT id, name, email FROM users WHERE id = $1")
      .bind(user_id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(user)
  }

  async fn get_address(&mut self, address_id: Uuid) -> Result<Option<Address>> {
    let address = sqlx::query_as::<_, Address>(
      "SELECT id, user_id, full_name, phone_no, address_line, city, state, country, postal_code
       FROM addresses WHERE id = $1",
    )
    .bind(address_id)
    .fetch_optional(&mut *self.tx)
    .await?;
    Ok(address)
  }

  async fn get_product(&mut self, product_id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>("SELECT id, name, price_cents, stock FROM products WHERE id = $1")
      .bind(product_id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(product)
  }

  async fn insert_order(&mut self, order: &Order) -> Result<()> {
    sqlx::query(
      "INSERT INTO orders (id, user_id, address_id, total_cents, payment_method, status, gateway_txn_id, created_at, updated_at)
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.address_id)
    .bind(order.total_cents)
    .bind(order.payment_method)
    .bind(order.status)
    .bind(&order.gateway_txn_id)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *self.tx)
    .await?;
    Ok(())
  }

  async fn insert_order_item(&mut self, item: &OrderItem) -> Result<()> {
    sqlx::query(
      "INSERT INTO order_items (id, order_id, product_id, quantity, price_cents)
       VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price_cents)
    .execute(&mut *self.tx)
    .await?;
    Ok(())
  }

  async fn insert_payment(&mut self, payment: &Payment) -> Result<()> {
    sqlx::query(
      "INSERT INTO payments (id, order_id, transaction_id, method, status, created_at, updated_at)
       VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(payment.id)
    .bind(payment.order_id)
    .bind(&payment.transaction_id)
    .bind(payment.method)
    .bind(payment.status)
    .bind(payment.created_at)
    .bind(payment.updated_at)
    .execute(&mut *self.tx)
    .await?;
    Ok(())
  }

  async fn lock_order(&mut self, order_id: Uuid) -> Result<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1 FOR UPDATE"))
      .bind(order_id)
      .fetch_optional(&mut *self.tx)
      .await?;
    Ok(order)
  }

  async fn update_order_status(&mut self, order_id: Uuid, status: OrderStatus) -> Result<()> {
    sqlx::query("UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2")
      .bind(status)
      .bind(order_id)
      .execute(&mut *self.tx)
      .await?;
    Ok(())
  }

  async fn lock_payment_by_txn(&mut self, transaction_id: &str) -> Result<Option<Payment>> {
    let payment = sqlx::query_as::<_, Payment>(&format!(
      "SELECT {PAYMENT_COLUMNS} FROM payments WHERE transaction_id = $1 FOR UPDATE"
    ))
    .bind(transaction_id)
    .fetch_optional(&mut *self.tx)
    .await?;
    Ok(payment)
  }

  async fn update_payment_status(&mut self, payment_id: Uuid, status: PaymentStatus) -> Result<()> {
    sqlx::query("UPDATE payments SET status = $1, updated_at = NOW() WHERE id = $2")
      .bind(status)
      .bind(payment_id)
      .execute(&mut *self.tx)
      .await?;
    Ok(())
  }

  async fn delete_order(&mut self, order_id: Uuid) -> Result<bool> {
    // order_items and payments go with it via ON DELETE CASCADE.
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
      .bind(order_id)
      .execute(&mut *self.tx)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn commit(self: Box<Self>) -> Result<()> {
    self.tx.commit().await?;
    Ok(())
  }

  async fn rollback(self: Box<Self>) -> Result<()> {
    self.tx.rollback().await?;
    Ok(())
  }
}
