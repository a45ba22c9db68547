// storefront_server/src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub app_base_url: String,

  pub payment_initiation_url: String,
  pub payment_timeout: Duration,
  pub payment_max_attempts: u32,

  pub notify_sender: String,

  pub run_migrations: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = |var_name: &str| {
      env::var(var_name).map_err(|e| AppError::Config(format!("Missing environment variable '{}': {}", var_name, e)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let app_base_url = get_env("APP_BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", server_host, server_port));

    let payment_initiation_url =
      get_env("PAYMENT_INITIATION_URL").unwrap_or_else(|_| "http://localhost:3002/api/payment".to_string());
    let payment_timeout = get_env("PAYMENT_TIMEOUT_SECS")
      .unwrap_or_else(|_| "10".to_string())
      .parse::<u64>()
      .map(Duration::from_secs)
      .map_err(|e| AppError::Config(format!("Invalid PAYMENT_TIMEOUT_SECS: {}", e)))?;
    let payment_max_attempts = get_env("PAYMENT_MAX_ATTEMPTS")
      .unwrap_or_else(|_| "3".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid PAYMENT_MAX_ATTEMPTS: {}", e)))?;

    let notify_sender = get_env("NOTIFY_SENDER").unwrap_or_else(|_| "noreply@example.com".to_string());

    let run_migrations = get_env("RUN_MIGRATIONS")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid RUN_MIGRATIONS value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      app_base_url,
      payment_initiation_url,
      payment_timeout,
      payment_max_attempts,
      notify_sender,
      run_migrations,
    })
  }
}
