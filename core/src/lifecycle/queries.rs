// storefront_core/src/lifecycle/queries.rs

//! Read paths and explicit admin deletion.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::lifecycle::OrderLifecycle;
use crate::model::Payment;
use crate::storage::{OrderDetail, OrderFilter, OrderPage, OrderWithItems};

impl OrderLifecycle {
  pub async fn order_detail(&self, order_id: Uuid) -> Result<OrderDetail> {
    self
      .store()
      .order_detail(order_id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("order {}", order_id)))
  }

  /// A user's orders, newest first. An unknown user simply has none.
  pub async fn orders_for_user(&self, user_id: Uuid) -> Result<Vec<OrderWithItems>> {
    self.store().orders_for_user(user_id).await
  }

  pub async fn list_orders(&self, filter: &OrderFilter) -> Result<OrderPage> {
    self.store().list_orders(filter).await
  }

  pub async fn payments_for_order(&self, order_id: Uuid) -> Result<Vec<Payment>> {
    let payments = self.store().payments_for_order(order_id).await?;
    if payments.is_empty() {
      return Err(Error::NotFound(format!("payments for order {}", order_id)));
    }
    Ok(payments)
  }

  /// Admin-only removal. Items and payment rows follow by cascade, all
  /// inside one transaction.
  #[instrument(skip(self), fields(order_id = %order_id))]
  pub async fn delete_order(&self, order_id: Uuid) -> Result<()> {
    let mut tx = self.store().begin().await?;
    if !tx.delete_order(order_id).await? {
      return Err(Error::NotFound(format!("order {}", order_id)));
    }
    tx.commit().await?;
    info!("order deleted");
    Ok(())
  }
}
