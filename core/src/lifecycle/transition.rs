// storefront_core/src/lifecycle/transition.rs

//! The status transition engine: a fixed table of allowed moves,
//! applied as one read-validate-write transaction per request.

use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::lifecycle::OrderLifecycle;
use crate::model::{Order, OrderStatus};

impl OrderLifecycle {
  /// Applies an admin status change. The current status is read under a
  /// row lock in the same transaction that writes the new one, so two
  /// concurrent transitions cannot both validate against a stale read.
  #[instrument(skip(self), fields(order_id = %order_id, target = %target))]
  pub async fn transition_status(&self, order_id: Uuid, target: OrderStatus) -> Result<Order> {
    let mut tx = self.store().begin().await?;

    let order = tx
      .lock_order(order_id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("order {}", order_id)))?;

    if !order.status.can_transition_to(target) {
      // Dropping the transaction rolls back; the status stays as read.
      return Err(Error::InvalidTransition {
        from: order.status,
        to: target,
      });
    }

    tx.update_order_status(order_id, target).await?;
    let user = tx.get_user(order.user_id).await?;
    tx.commit().await?;

    info!(from = %order.status, to = %target, "order status updated");

    if let Some(user) = user {
      self
        .notify(
          &user.email,
          format!("Order Status Updated to '{}'", target),
          format!("Your order {} status has been changed to '{}'.", order_id, target),
        )
        .await;
    }

    Ok(Order {
      status: target,
      updated_at: chrono::Utc::now(),
      ..order
    })
  }
}
