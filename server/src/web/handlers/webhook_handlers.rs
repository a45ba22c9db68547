// storefront_server/src/web/handlers/webhook_handlers.rs

//! Gateway payment confirmations. Signature verification is middleware
//! territory and is assumed to have run before this handler; the
//! handler itself only reconciles state and must tolerate duplicate
//! delivery.

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use storefront_core::lifecycle::{PaymentOutcome, WebhookEvent};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
  pub transaction_id: String,
  /// Some gateways echo their own order reference; unused here.
  pub order_id: Option<String>,
  pub status: String,
}

#[instrument(name = "handler::payment_webhook", skip(app_state, payload), fields(transaction_id = %payload.transaction_id))]
pub async fn payment_webhook_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<WebhookPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let outcome: PaymentOutcome = payload.status.parse().map_err(AppError::Core)?;

  let result = app_state
    .lifecycle
    .confirm_payment(WebhookEvent {
      transaction_id: payload.transaction_id,
      outcome,
    })
    .await?;

  info!(changed = result.changed, "webhook acknowledged");
  // Duplicates acknowledge with 200 as well, so the gateway stops retrying.
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "orderStatus": result.order_status,
    "paymentStatus": result.payment_status,
  })))
}
