// storefront_core/src/services/mod.rs

//! Collaborators the lifecycle consumes as black boxes: the external
//! payment gateway and the notification sender. Mock implementations
//! live here too so tests and local runs can script their behavior.

pub mod gateway;
pub mod mocks;
pub mod notify;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// What the gateway needs to start a payment. Payer name/phone are
/// forwarded verbatim when the caller supplied them.
#[derive(Debug, Clone)]
pub struct InitiateRequest {
  pub transaction_id: String,
  pub order_id: Uuid,
  pub user_id: Uuid,
  pub amount_cents: i64,
  pub payer_name: Option<String>,
  pub payer_phone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayRedirect {
  /// Where the buyer completes the payment.
  pub redirect_url: String,
}

/// External payment-initiation collaborator. A failure here during
/// checkout is a checkout failure: the caller rolls everything back.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn initiate(&self, request: &InitiateRequest) -> Result<GatewayRedirect>;
}

#[derive(Debug, Clone)]
pub struct Notification {
  pub recipient: String,
  pub subject: String,
  pub body: String,
}

/// Fire-and-forget notification sender. Callers log and swallow errors;
/// a failed notification never rolls back the operation that sent it.
#[async_trait]
pub trait Notifier: Send + Sync {
  async fn send(&self, notification: &Notification) -> Result<()>;
}
