// storefront_server/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use storefront_core::Error as CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

// Lets handlers use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it is turned into a response.
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Core(core) => match core {
        CoreError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
        CoreError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
        CoreError::InvalidTransition { from, to } => HttpResponse::Conflict().json(json!({
          "error": format!("Invalid status transition: '{}' to '{}' is not allowed", from, to),
          "from": from,
          "to": to,
        })),
        CoreError::Gateway(m) => {
          HttpResponse::BadGateway().json(json!({"error": "Payment provider error", "detail": m}))
        }
        // Storage details stay server-side.
        CoreError::Storage(_) => HttpResponse::InternalServerError().json(json!({"error": "Database operation failed"})),
        CoreError::Internal(_) => {
          HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred"}))
        }
      },
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Internal(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred"}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
