// storefront_core/src/services/gateway.rs

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{instrument, warn};

use crate::error::{Error, Result};
use crate::services::{GatewayRedirect, InitiateRequest, PaymentGateway};

#[derive(Debug, Clone)]
pub struct GatewayConfig {
  /// POST endpoint of the payment-initiation service.
  pub initiation_url: String,
  /// Per-attempt timeout. A timed-out attempt counts against the budget.
  pub timeout: Duration,
  /// Total attempts before the initiation is reported as failed.
  pub max_attempts: u32,
}

impl Default for GatewayConfig {
  fn default() -> Self {
    Self {
      initiation_url: "http://localhost:3002/api/payment".to_string(),
      timeout: Duration::from_secs(10),
      max_attempts: 3,
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InitiationBody<'a> {
  transaction_id: &'a str,
  #[serde(rename = "MUID")]
  muid: String,
  name: Option<&'a str>,
  number: Option<&'a str>,
  amount: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitiationResponse {
  success: bool,
  redirect_url: Option<String>,
  message: Option<String>,
}

/// Payment-initiation client over HTTP. Retries transport failures and
/// timeouts with doubling backoff up to the configured attempt cap;
/// a definitive "success: false" from the gateway is not retried.
pub struct HttpPaymentGateway {
  client: reqwest::Client,
  config: GatewayConfig,
}

impl HttpPaymentGateway {
  pub fn new(config: GatewayConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| Error::Gateway(format!("failed to build HTTP client: {}", e)))?;
    Ok(Self { client, config })
  }

  async fn attempt(&self, request: &InitiateRequest) -> std::result::Result<GatewayRedirect, AttemptError> {
    let body = InitiationBody {
      transaction_id: &request.transaction_id,
      muid: request.user_id.to_string(),
      name: request.payer_name.as_deref(),
      number: request.payer_phone.as_deref(),
      amount: request.amount_cents,
    };

    let response = self
      .client
      .post(&self.config.initiation_url)
      .json(&body)
      .send()
      .await
      .map_err(|e| AttemptError::Retryable(e.to_string()))?;

    if response.status().is_server_error() {
      return Err(AttemptError::Retryable(format!("gateway returned {}", response.status())));
    }
    if !response.status().is_success() {
      return Err(AttemptError::Fatal(format!("gateway returned {}", response.status())));
    }

    let parsed: InitiationResponse = response
      .json()
      .await
      .map_err(|e| AttemptError::Fatal(format!("malformed gateway response: {}", e)))?;

    if !parsed.success {
      let reason = parsed.message.unwrap_or_else(|| "payment initiation declined".to_string());
      return Err(AttemptError::Fatal(reason));
    }
    match parsed.redirect_url {
      Some(url) => Ok(GatewayRedirect { redirect_url: url }),
      None => Err(AttemptError::Fatal("gateway reported success without a redirect URL".to_string())),
    }
  }
}

enum AttemptError {
  /// Transport error or 5xx: worth another attempt.
  Retryable(String),
  /// Definitive refusal: retrying cannot help.
  Fatal(String),
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
  #[instrument(skip(self, request), fields(transaction_id = %request.transaction_id, amount_cents = request.amount_cents))]
  async fn initiate(&self, request: &InitiateRequest) -> Result<GatewayRedirect> {
    let mut backoff = Duration::from_millis(200);
    let mut last_error = String::new();

    for attempt in 1..=self.config.max_attempts.max(1) {
      match self.attempt(request).await {
        Ok(redirect) => return Ok(redirect),
        Err(AttemptError::Fatal(reason)) => return Err(Error::Gateway(reason)),
        Err(AttemptError::Retryable(reason)) => {
          warn!(attempt, %reason, "payment initiation attempt failed");
          last_error = reason;
        }
      }
      if attempt < self.config.max_attempts {
        tokio::time::sleep(backoff).await;
        backoff *= 2;
      }
    }

    Err(Error::Gateway(format!(
      "payment initiation failed after {} attempts: {}",
      self.config.max_attempts.max(1),
      last_error
    )))
  }
}
