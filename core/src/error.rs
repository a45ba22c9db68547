// storefront_core/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

use crate::model::OrderStatus;

#[derive(Debug, Error)]
pub enum Error {
  #[error("Validation error: {0}")]
  Validation(String),

  #[error("Not found: {0}")]
  NotFound(String),

  #[error("Invalid status transition: '{from}' to '{to}' is not allowed")]
  InvalidTransition { from: OrderStatus, to: OrderStatus },

  #[error("Payment gateway error: {0}")]
  Gateway(String),

  #[error("Storage error: {0}")]
  Storage(#[from] sqlx::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

// Lets callers use `?` on anyhow-returning helpers inside lifecycle code.
impl From<AnyhowError> for Error {
  fn from(err: AnyhowError) -> Self {
    if err.is::<sqlx::Error>() {
      return Error::Storage(err.downcast::<sqlx::Error>().unwrap());
    }
    Error::Internal(err.to_string())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
