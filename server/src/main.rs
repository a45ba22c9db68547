// storefront_server/src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

use storefront_core::lifecycle::OrderLifecycle;
use storefront_core::services::gateway::{GatewayConfig, HttpPaymentGateway};
use storefront_core::services::notify::LogNotifier;
use storefront_core::storage::postgres::PgStore;
use storefront_core::storage::Store;

use storefront_server::config::AppConfig;
use storefront_server::state::AppState;
use storefront_server::web::routes::configure_app_routes;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  tracing_subscriber::fmt()
    .with_max_level(Level::INFO)
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env()) // Allow RUST_LOG override
    .with_span_events(FmtSpan::CLOSE)
    .init();

  tracing::info!("Starting storefront server...");

  let app_config = match AppConfig::from_env() {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      panic!("Configuration error: {}", e);
    }
  };

  let store = match PgStore::connect(&app_config.database_url).await {
    Ok(store) => {
      tracing::info!("Successfully connected to the database.");
      store
    }
    Err(e) => {
      tracing::error!(error = %e, "Failed to connect to the database.");
      panic!("Database connection error: {}", e);
    }
  };

  if app_config.run_migrations {
    if let Err(e) = store.migrate().await {
      tracing::error!(error = %e, "Failed to run database migrations.");
      panic!("Migration error: {}", e);
    }
    tracing::info!("Database migrations applied.");
  }

  let gateway = HttpPaymentGateway::new(GatewayConfig {
    initiation_url: app_config.payment_initiation_url.clone(),
    timeout: app_config.payment_timeout,
    max_attempts: app_config.payment_max_attempts,
  })
  .unwrap_or_else(|e| panic!("Payment gateway client error: {}", e));

  let lifecycle = Arc::new(OrderLifecycle::new(
    Arc::new(store) as Arc<dyn Store>,
    Arc::new(gateway),
    Arc::new(LogNotifier::new(app_config.notify_sender.clone())),
  ));

  let app_state = AppState {
    lifecycle,
    config: app_config.clone(),
  };

  let server_address = format!("{}:{}", app_config.server_host, app_config.server_port);
  tracing::info!("Attempting to bind server to {}...", server_address);

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
