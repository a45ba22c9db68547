// storefront_server/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[instrument(name = "handler::payments_for_order", skip(app_state))]
pub async fn payments_for_order_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let payments = app_state.lifecycle.payments_for_order(order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "payments": payments })))
}
