// storefront_core/src/lib.rs

//! Order lifecycle engine for the storefront backend.
//!
//! The crate owns three operations with real invariants:
//!
//! - **Checkout** ([`OrderLifecycle::checkout`]): atomically creates an
//!   order, its snapshotted line items, and the initial payment record.
//!   Gateway initiation failure rolls the whole thing back.
//! - **Status transitions** ([`OrderLifecycle::transition_status`]): a
//!   fixed finite-state table; anything off the table is rejected.
//! - **Payment confirmation** ([`OrderLifecycle::confirm_payment`]):
//!   idempotent reconciliation of asynchronous gateway reports.
//!
//! Storage, the payment gateway, and the notification sender are all
//! injected behind traits; see [`storage`] and [`services`].

pub mod error;
pub mod lifecycle;
pub mod model;
pub mod services;
pub mod storage;

pub use error::{Error, Result};
pub use lifecycle::{
  CheckoutItem, CheckoutOutcome, CheckoutRequest, ConfirmationOutcome, OrderLifecycle, PaymentOutcome, WebhookEvent,
};
pub use model::{Order, OrderItem, OrderStatus, Payment, PaymentMethod, PaymentStatus};
pub use storage::{memory::MemoryStore, postgres::PgStore, OrderDetail, OrderFilter, OrderPage, OrderWithItems};
