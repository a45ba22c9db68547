// storefront_server/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{order_handlers, payment_handlers, webhook_handlers};

async fn health_check_handler() -> actix_web::HttpResponse {
  actix_web::HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

// Called from `main.rs` (and the HTTP tests) to configure the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(health_check_handler))
      .service(
        web::scope("/orders")
          .route("/checkout", web::post().to(order_handlers::checkout_handler))
          .route("/user/{user_id}", web::get().to(order_handlers::user_orders_handler))
          .route("/{order_id}/status", web::put().to(order_handlers::update_status_handler))
          .route("/{order_id}", web::get().to(order_handlers::get_order_handler))
          .route("/{order_id}", web::delete().to(order_handlers::delete_order_handler))
          .route("", web::get().to(order_handlers::list_orders_handler)),
      )
      .service(
        web::scope("/payments").route("/{order_id}", web::get().to(payment_handlers::payments_for_order_handler)),
      )
      .service(
        web::scope("/webhooks").route("/payments", web::post().to(webhook_handlers::payment_webhook_handler)),
      ),
  );
}
