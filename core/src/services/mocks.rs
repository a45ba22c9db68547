// storefront_core/src/services/mocks.rs

//! Scriptable collaborator doubles. Shipped in `src/` rather than a
//! test module so the server's tests and local development can use
//! them too.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::services::{GatewayRedirect, InitiateRequest, Notification, Notifier, PaymentGateway};

enum GatewayScript {
  Succeed { redirect_url: String },
  Fail { reason: String },
}

/// Payment gateway double. Succeeds with a canned redirect URL by
/// default; `fail_with` scripts a refusal. Records every initiation
/// request it receives.
pub struct MockGateway {
  script: Mutex<GatewayScript>,
  calls: Mutex<Vec<InitiateRequest>>,
}

impl Default for MockGateway {
  fn default() -> Self {
    Self {
      script: Mutex::new(GatewayScript::Succeed {
        redirect_url: "https://pay.example.test/redirect".to_string(),
      }),
      calls: Mutex::new(Vec::new()),
    }
  }
}

impl MockGateway {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn succeed_with(&self, redirect_url: impl Into<String>) {
    *self.script.lock() = GatewayScript::Succeed {
      redirect_url: redirect_url.into(),
    };
  }

  pub fn fail_with(&self, reason: impl Into<String>) {
    *self.script.lock() = GatewayScript::Fail { reason: reason.into() };
  }

  pub fn calls(&self) -> Vec<InitiateRequest> {
    self.calls.lock().clone()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  async fn initiate(&self, request: &InitiateRequest) -> Result<GatewayRedirect> {
    self.calls.lock().push(request.clone());
    match &*self.script.lock() {
      GatewayScript::Succeed { redirect_url } => Ok(GatewayRedirect {
        redirect_url: redirect_url.clone(),
      }),
      GatewayScript::Fail { reason } => Err(Error::Gateway(reason.clone())),
    }
  }
}

/// Notifier double recording everything it is asked to send. `fail_all`
/// makes every send fail, for asserting that callers treat
/// notifications as best-effort.
#[derive(Default)]
pub struct MockNotifier {
  sent: Mutex<Vec<Notification>>,
  fail_all: Mutex<bool>,
}

impl MockNotifier {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn fail_all(&self) {
    *self.fail_all.lock() = true;
  }

  pub fn sent(&self) -> Vec<Notification> {
    self.sent.lock().clone()
  }
}

#[async_trait]
impl Notifier for MockNotifier {
  async fn send(&self, notification: &Notification) -> Result<()> {
    if *self.fail_all.lock() {
      return Err(Error::Internal("notifier scripted to fail".to_string()));
    }
    self.sent.lock().push(notification.clone());
    Ok(())
  }
}
