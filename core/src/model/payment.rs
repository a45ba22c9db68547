// storefront_core/src/model/payment.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

use crate::model::PaymentMethod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "payment_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
  /// COD: money changes hands at delivery.
  Pending,
  /// Gateway payment started, awaiting asynchronous confirmation.
  Initiated,
  Success,
  Failed,
  Refunded,
}

impl fmt::Display for PaymentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      PaymentStatus::Pending => "pending",
      PaymentStatus::Initiated => "initiated",
      PaymentStatus::Success => "success",
      PaymentStatus::Failed => "failed",
      PaymentStatus::Refunded => "refunded",
    };
    f.write_str(s)
  }
}

/// A payment attempt tied to an order. Never deleted through the API,
/// only updated as the gateway reports outcomes.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Payment {
  pub id: Uuid,
  pub order_id: Uuid,
  /// External transaction reference, unique when present. `None` for COD.
  pub transaction_id: Option<String>,
  pub method: PaymentMethod,
  pub status: PaymentStatus,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
