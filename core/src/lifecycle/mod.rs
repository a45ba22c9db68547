// storefront_core/src/lifecycle/mod.rs

//! The order lifecycle manager: checkout orchestration, the status
//! transition engine, payment confirmation, and order queries/deletion.
//! All collaborators are injected; there is no global state.

pub mod checkout;
pub mod confirmation;
pub mod queries;
pub mod transition;

use std::sync::Arc;

use tracing::warn;

use crate::services::{Notification, Notifier, PaymentGateway};
use crate::storage::Store;

pub use checkout::{CheckoutItem, CheckoutOutcome, CheckoutRequest};
pub use confirmation::{ConfirmationOutcome, PaymentOutcome, WebhookEvent};

pub struct OrderLifecycle {
  store: Arc<dyn Store>,
  gateway: Arc<dyn PaymentGateway>,
  notifier: Arc<dyn Notifier>,
}

impl OrderLifecycle {
  pub fn new(store: Arc<dyn Store>, gateway: Arc<dyn PaymentGateway>, notifier: Arc<dyn Notifier>) -> Self {
    Self {
      store,
      gateway,
      notifier,
    }
  }

  pub fn store(&self) -> &Arc<dyn Store> {
    &self.store
  }

  /// Best-effort dispatch: a failed notification is logged and
  /// swallowed, never surfaced to the caller.
  pub(crate) async fn notify(&self, recipient: &str, subject: String, body: String) {
    let notification = Notification {
      recipient: recipient.to_string(),
      subject,
      body,
    };
    if let Err(error) = self.notifier.send(&notification).await {
      warn!(%error, recipient = %notification.recipient, "notification dispatch failed");
    }
  }
}
