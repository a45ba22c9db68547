// storefront_core/src/lifecycle/confirmation.rs

//! Payment-confirmation (webhook) handling: reconciles an asynchronous
//! gateway report with the payment and order rows. Deliveries are
//! idempotent and never regress a settled payment or an order that has
//! already entered fulfillment. Signature verification is assumed to
//! have happened upstream.

use std::str::FromStr;

use tracing::{info, instrument, warn};

use crate::error::{Error, Result};
use crate::lifecycle::OrderLifecycle;
use crate::model::{OrderStatus, PaymentStatus};

/// Terminal outcome reported by the gateway, parsed from the payload's
/// status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
  Success,
  Failed,
}

impl FromStr for PaymentOutcome {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "success" | "succeeded" | "paid" | "completed" => Ok(PaymentOutcome::Success),
      "failed" | "failure" | "declined" => Ok(PaymentOutcome::Failed),
      other => Err(Error::Validation(format!("unrecognized payment status: '{}'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct WebhookEvent {
  pub transaction_id: String,
  pub outcome: PaymentOutcome,
}

#[derive(Debug, Clone)]
pub struct ConfirmationOutcome {
  pub payment_status: PaymentStatus,
  pub order_status: OrderStatus,
  /// False when the delivery was a duplicate or otherwise a no-op.
  pub changed: bool,
}

impl OrderLifecycle {
  /// Applies one webhook delivery. All updates happen in a single
  /// transaction keyed by the external transaction id.
  #[instrument(skip(self, event), fields(transaction_id = %event.transaction_id, outcome = ?event.outcome))]
  pub async fn confirm_payment(&self, event: WebhookEvent) -> Result<ConfirmationOutcome> {
    let mut tx = self.store().begin().await?;

    let payment = tx
      .lock_payment_by_txn(&event.transaction_id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("payment with transaction id '{}'", event.transaction_id)))?;
    let order = tx
      .lock_order(payment.order_id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("order {}", payment.order_id)))?;

    let (payment_target, order_target) = match event.outcome {
      PaymentOutcome::Success => {
        // Never touch fulfillment: only an order still waiting on its
        // payment moves to `paid`.
        let order_target = matches!(order.status, OrderStatus::Initiated | OrderStatus::PaymentFailed)
          .then_some(OrderStatus::Paid);
        (PaymentStatus::Success, order_target)
      }
      PaymentOutcome::Failed => {
        if payment.status == PaymentStatus::Success {
          // A failure report after a recorded success is noise.
          warn!(payment_id = %payment.id, "ignoring failure report for settled payment");
          tx.rollback().await?;
          return Ok(ConfirmationOutcome {
            payment_status: payment.status,
            order_status: order.status,
            changed: false,
          });
        }
        let order_target = (order.status == OrderStatus::Initiated).then_some(OrderStatus::PaymentFailed);
        (PaymentStatus::Failed, order_target)
      }
    };

    let payment_changed = payment.status != payment_target;
    if payment_changed {
      tx.update_payment_status(payment.id, payment_target).await?;
    }
    let order_changed = order_target.is_some_and(|target| target != order.status);
    if let Some(target) = order_target.filter(|_| order_changed) {
      tx.update_order_status(order.id, target).await?;
    }

    if !payment_changed && !order_changed {
      // Duplicate delivery; acknowledge without writing anything.
      tx.rollback().await?;
      info!(payment_id = %payment.id, "duplicate webhook delivery, nothing to do");
      return Ok(ConfirmationOutcome {
        payment_status: payment.status,
        order_status: order.status,
        changed: false,
      });
    }

    let user = tx.get_user(order.user_id).await?;
    tx.commit().await?;

    let final_order_status = order_target.unwrap_or(order.status);
    info!(
      payment_status = %payment_target,
      order_status = %final_order_status,
      "payment confirmation applied"
    );

    if order_changed {
      if let Some(user) = user {
        self
          .notify(
            &user.email,
            format!("Order Status Updated to '{}'", final_order_status),
            format!(
              "Your order {} status has been changed to '{}'.",
              order.id, final_order_status
            ),
          )
          .await;
      }
    }

    Ok(ConfirmationOutcome {
      payment_status: payment_target,
      order_status: final_order_status,
      changed: true,
    })
  }
}
