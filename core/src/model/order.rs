// storefront_core/src/model/order.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use crate::error::Error;

/// Lifecycle status of an order.
///
/// `Paid` and `PaymentFailed` are reserved for the payment-confirmation
/// path; the admin transition table never produces them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
  Initiated,
  Paid,
  PaymentFailed,
  Shipped,
  Delivered,
  Canceled,
  Return,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 7] = [
    OrderStatus::Initiated,
    OrderStatus::Paid,
    OrderStatus::PaymentFailed,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Canceled,
    OrderStatus::Return,
  ];

  /// Statuses an admin update may move this order to.
  pub fn admin_targets(self) -> &'static [OrderStatus] {
    match self {
      OrderStatus::Initiated => &[OrderStatus::Shipped, OrderStatus::Delivered, OrderStatus::Canceled],
      OrderStatus::Paid => &[OrderStatus::Shipped, OrderStatus::Delivered, OrderStatus::Canceled],
      OrderStatus::PaymentFailed => &[OrderStatus::Canceled],
      OrderStatus::Shipped => &[OrderStatus::Delivered, OrderStatus::Canceled],
      OrderStatus::Delivered => &[OrderStatus::Return],
      OrderStatus::Canceled | OrderStatus::Return => &[],
    }
  }

  pub fn can_transition_to(self, target: OrderStatus) -> bool {
    self.admin_targets().contains(&target)
  }

  /// Terminal states have no outgoing admin transitions.
  pub fn is_terminal(self) -> bool {
    self.admin_targets().is_empty()
  }

  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Initiated => "initiated",
      OrderStatus::Paid => "paid",
      OrderStatus::PaymentFailed => "payment_failed",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Delivered => "delivered",
      OrderStatus::Canceled => "canceled",
      OrderStatus::Return => "return",
    }
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "initiated" => Ok(OrderStatus::Initiated),
      "paid" => Ok(OrderStatus::Paid),
      "payment_failed" => Ok(OrderStatus::PaymentFailed),
      "shipped" => Ok(OrderStatus::Shipped),
      "delivered" => Ok(OrderStatus::Delivered),
      "canceled" => Ok(OrderStatus::Canceled),
      "return" => Ok(OrderStatus::Return),
      other => Err(Error::Validation(format!("Invalid status provided: '{}'", other))),
    }
  }
}

/// How the buyer pays. `Cod` settles offline; the gateway variants go
/// through the external payment-initiation call at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
  Cod,
  Phonepe,
  Razorpay,
}

impl PaymentMethod {
  pub fn is_gateway(self) -> bool {
    !matches!(self, PaymentMethod::Cod)
  }

  pub fn as_str(self) -> &'static str {
    match self {
      PaymentMethod::Cod => "cod",
      PaymentMethod::Phonepe => "phonepe",
      PaymentMethod::Razorpay => "razorpay",
    }
  }
}

impl fmt::Display for PaymentMethod {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for PaymentMethod {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "cod" => Ok(PaymentMethod::Cod),
      "phonepe" => Ok(PaymentMethod::Phonepe),
      "razorpay" => Ok(PaymentMethod::Razorpay),
      other => Err(Error::Validation(format!("Invalid payment method: '{}'", other))),
    }
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub address_id: Uuid,
  pub total_cents: i64,
  pub payment_method: PaymentMethod,
  pub status: OrderStatus,
  /// External payment-gateway order reference (`TXN_<uuid>`), absent for COD.
  pub gateway_txn_id: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  /// Unit price snapshotted at order time; never recomputed afterwards.
  pub price_cents: i64,
}
