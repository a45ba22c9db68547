// storefront_server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use storefront_core::lifecycle::{CheckoutItem, CheckoutRequest};
use storefront_core::model::{OrderStatus, PaymentMethod};
use storefront_core::storage::OrderFilter;
use storefront_core::Error as CoreError;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CheckoutPayload {
  pub user_id: Uuid,
  pub address_id: Uuid,
  pub items: Vec<CheckoutItem>,
  pub total_cents: i64,
  pub payment_method: String,
  pub name: Option<String>,
  pub number: Option<String>,
}

#[instrument(name = "handler::checkout", skip(app_state, payload), fields(user_id = %payload.user_id))]
pub async fn checkout_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CheckoutPayload>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let payment_method: PaymentMethod = payload.payment_method.parse().map_err(AppError::Core)?;

  let outcome = app_state
    .lifecycle
    .checkout(CheckoutRequest {
      user_id: payload.user_id,
      address_id: payload.address_id,
      items: payload.items,
      total_cents: payload.total_cents,
      payment_method,
      payer_name: payload.name,
      payer_phone: payload.number,
    })
    .await?;

  info!(order_id = %outcome.order.id, "checkout completed");
  Ok(HttpResponse::Created().json(json!({
    "success": true,
    "message": outcome.message,
    "order": outcome.order,
    "items": outcome.items,
    "payment": outcome.payment,
    "redirectUrl": outcome.redirect_url,
  })))
}

#[instrument(name = "handler::get_order", skip(app_state))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let detail = app_state.lifecycle.order_detail(order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "order": detail.order,
    "address": detail.address,
    "items": detail.items,
  })))
}

#[instrument(name = "handler::user_orders", skip(app_state))]
pub async fn user_orders_handler(
  app_state: web::Data<AppState>,
  user_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.lifecycle.orders_for_user(user_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true, "orders": orders })))
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
  pub status: Option<String>,
  pub payment_method: Option<String>,
  pub start_date: Option<String>,
  pub end_date: Option<String>,
  pub page: Option<u32>,
  pub limit: Option<u32>,
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates; a bare end
/// date is widened to the end of that day.
fn parse_date_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Ok(dt.with_timezone(&Utc));
  }
  let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .map_err(|_| AppError::Core(CoreError::Validation(format!("invalid date bound: '{}'", raw))))?;
  let time = if end_of_day {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap()
  } else {
    NaiveTime::MIN
  };
  Ok(Utc.from_utc_datetime(&date.and_time(time)))
}

#[instrument(name = "handler::list_orders", skip(app_state, query))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();

  let status = query
    .status
    .as_deref()
    .map(str::parse::<OrderStatus>)
    .transpose()
    .map_err(AppError::Core)?;
  let payment_method = query
    .payment_method
    .as_deref()
    .map(str::parse::<PaymentMethod>)
    .transpose()
    .map_err(AppError::Core)?;
  let created_from = query
    .start_date
    .as_deref()
    .map(|raw| parse_date_bound(raw, false))
    .transpose()?;
  let created_to = query
    .end_date
    .as_deref()
    .map(|raw| parse_date_bound(raw, true))
    .transpose()?;

  let filter = OrderFilter {
    status,
    payment_method,
    created_from,
    created_to,
    page: query.page.unwrap_or(1),
    limit: query.limit.unwrap_or(10),
  };

  let page = app_state.lifecycle.list_orders(&filter).await?;
  let served = u64::from(filter.page()) * u64::from(filter.limit());
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "totalOrders": page.total,
    "ordersLeft": page.total.saturating_sub(served),
    "orders": page.orders,
  })))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdatePayload {
  pub status: String,
}

#[instrument(name = "handler::update_status", skip(app_state, payload))]
pub async fn update_status_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<Uuid>,
  payload: web::Json<StatusUpdatePayload>,
) -> Result<HttpResponse, AppError> {
  let target: OrderStatus = payload.status.parse().map_err(AppError::Core)?;
  let order = app_state.lifecycle.transition_status(order_id.into_inner(), target).await?;

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Order status updated successfully",
    "order": {
      "order_id": order.id,
      "status": order.status,
      "created_at": order.created_at,
      "user_id": order.user_id,
    },
  })))
}

#[instrument(name = "handler::delete_order", skip(app_state))]
pub async fn delete_order_handler(
  app_state: web::Data<AppState>,
  order_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  app_state.lifecycle.delete_order(order_id.into_inner()).await?;
  Ok(HttpResponse::Ok().json(json!({ "success": true })))
}
