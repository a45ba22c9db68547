// storefront_server/src/state.rs

use std::sync::Arc;

use storefront_core::lifecycle::OrderLifecycle;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
  pub lifecycle: Arc<OrderLifecycle>,
  pub config: Arc<AppConfig>,
}
