// storefront_core/src/lifecycle/checkout.rs

//! Checkout orchestration: one atomic transaction creating the order,
//! its line items, and the initial payment record, branching on the
//! payment method.

use chrono::Utc;
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::lifecycle::OrderLifecycle;
use crate::model::{Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus, User};
use crate::services::InitiateRequest;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutItem {
  pub product_id: Uuid,
  pub quantity: i32,
  /// Unit price as quoted to the buyer. Trusted as-is (price locked at
  /// cart time); the declared total must still be consistent with it.
  pub price_cents: i64,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
  pub user_id: Uuid,
  pub address_id: Uuid,
  pub items: Vec<CheckoutItem>,
  pub total_cents: i64,
  pub payment_method: PaymentMethod,
  pub payer_name: Option<String>,
  pub payer_phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CheckoutOutcome {
  pub order: Order,
  pub items: Vec<OrderItem>,
  pub payment: Payment,
  /// Where to send the buyer to complete a gateway payment. `None` for COD.
  pub redirect_url: Option<String>,
  pub message: String,
}

fn validate(request: &CheckoutRequest) -> Result<()> {
  if request.items.is_empty() {
    return Err(Error::Validation("order must contain at least one item".to_string()));
  }
  if request.total_cents < 0 {
    return Err(Error::Validation("total must not be negative".to_string()));
  }
  let mut sum: i64 = 0;
  for item in &request.items {
    if item.quantity < 1 {
      return Err(Error::Validation(format!(
        "quantity for product {} must be positive",
        item.product_id
      )));
    }
    if item.price_cents < 0 {
      return Err(Error::Validation(format!(
        "price for product {} must not be negative",
        item.product_id
      )));
    }
    let line_total = item
      .price_cents
      .checked_mul(i64::from(item.quantity))
      .ok_or_else(|| Error::Validation(format!("line total for product {} overflows", item.product_id)))?;
    sum = sum
      .checked_add(line_total)
      .ok_or_else(|| Error::Validation("order total overflows".to_string()))?;
  }
  if sum != request.total_cents {
    return Err(Error::Validation(format!(
      "declared total {} does not match sum of line totals {}",
      request.total_cents, sum
    )));
  }
  Ok(())
}

impl OrderLifecycle {
  /// Creates an order, its line items, and the initial payment record
  /// in one transaction. For gateway methods the external initiation
  /// call happens before commit: if it fails, nothing is persisted.
  #[instrument(skip(self, request), fields(user_id = %request.user_id, method = %request.payment_method))]
  pub async fn checkout(&self, request: CheckoutRequest) -> Result<CheckoutOutcome> {
    validate(&request)?;

    let mut tx = self.store().begin().await?;

    let user = tx
      .get_user(request.user_id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("user {}", request.user_id)))?;
    let address = tx
      .get_address(request.address_id)
      .await?
      .ok_or_else(|| Error::NotFound(format!("address {}", request.address_id)))?;
    if address.user_id != request.user_id {
      return Err(Error::NotFound(format!("address {}", request.address_id)));
    }
    for item in &request.items {
      tx.get_product(item.product_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("product {}", item.product_id)))?;
    }

    let now = Utc::now();
    let gateway_txn_id = request
      .payment_method
      .is_gateway()
      .then(|| format!("TXN_{}", Uuid::new_v4()));

    let order = Order {
      id: Uuid::new_v4(),
      user_id: request.user_id,
      address_id: request.address_id,
      total_cents: request.total_cents,
      payment_method: request.payment_method,
      status: OrderStatus::Initiated,
      gateway_txn_id: gateway_txn_id.clone(),
      created_at: now,
      updated_at: now,
    };
    tx.insert_order(&order).await?;

    let mut items = Vec::with_capacity(request.items.len());
    for line in &request.items {
      let item = OrderItem {
        id: Uuid::new_v4(),
        order_id: order.id,
        product_id: line.product_id,
        quantity: line.quantity,
        price_cents: line.price_cents,
      };
      tx.insert_order_item(&item).await?;
      items.push(item);
    }

    let payment = Payment {
      id: Uuid::new_v4(),
      order_id: order.id,
      transaction_id: gateway_txn_id.clone(),
      method: request.payment_method,
      status: if request.payment_method.is_gateway() {
        PaymentStatus::Initiated
      } else {
        PaymentStatus::Pending
      },
      created_at: now,
      updated_at: now,
    };
    tx.insert_payment(&payment).await?;

    if let Some(transaction_id) = gateway_txn_id {
      let initiation = InitiateRequest {
        transaction_id,
        order_id: order.id,
        user_id: user.id,
        amount_cents: order.total_cents,
        payer_name: request.payer_name.clone(),
        payer_phone: request.payer_phone.clone(),
      };
      // Initiation failure is a checkout failure: roll everything back.
      let redirect = match self.gateway.initiate(&initiation).await {
        Ok(redirect) => redirect,
        Err(error) => {
          tx.rollback().await?;
          return Err(error);
        }
      };
      tx.commit().await?;

      info!(order_id = %order.id, "gateway checkout committed");
      self.send_pay_link(&user, &order, &redirect.redirect_url).await;
      return Ok(CheckoutOutcome {
        order,
        items,
        payment,
        redirect_url: Some(redirect.redirect_url),
        message: "Order created, awaiting payment.".to_string(),
      });
    }

    tx.commit().await?;

    info!(order_id = %order.id, "COD checkout committed");
    self.send_cod_confirmation(&user, &order).await;
    Ok(CheckoutOutcome {
      order,
      items,
      payment,
      redirect_url: None,
      message: "Order created successfully, awaiting Cash on Delivery payment.".to_string(),
    })
  }

  async fn send_cod_confirmation(&self, user: &User, order: &Order) {
    self
      .notify(
        &user.email,
        "Order Confirmed - Cash on Delivery".to_string(),
        format!(
          "Your order has been placed!\nOrder ID: {}\nWe will deliver your order soon. Please keep the payment ready.",
          order.id
        ),
      )
      .await;
  }

  async fn send_pay_link(&self, user: &User, order: &Order, redirect_url: &str) {
    self
      .notify(
        &user.email,
        format!("Order Initiated - {} Payment", order.payment_method),
        format!(
          "Thank you for your order!\nYour order ID: {}\nPlease complete your payment here: {}",
          order.id, redirect_url
        ),
      )
      .await;
  }
}
