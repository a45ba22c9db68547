// storefront_core/src/model/mod.rs

//! Data structures representing database entities.

pub mod catalog;
pub mod order;
pub mod payment;

pub use catalog::{Address, Product, User};
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod};
pub use payment::{Payment, PaymentStatus};
