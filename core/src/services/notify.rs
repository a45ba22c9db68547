// storefront_core/src/services/notify.rs

use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::services::{Notification, Notifier};

/// Notifier that only logs. Stands in for the mail transport, which is
/// a collaborator outside this crate.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
  pub sender: String,
}

impl LogNotifier {
  pub fn new(sender: impl Into<String>) -> Self {
    Self { sender: sender.into() }
  }
}

#[async_trait]
impl Notifier for LogNotifier {
  async fn send(&self, notification: &Notification) -> Result<()> {
    info!(
      sender = %self.sender,
      recipient = %notification.recipient,
      subject = %notification.subject,
      "dispatching notification"
    );
    Ok(())
  }
}
