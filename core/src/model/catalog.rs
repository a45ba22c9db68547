// storefront_core/src/model/catalog.rs

//! Rows the order lifecycle reads but does not own. Their CRUD surface
//! lives elsewhere; checkout only validates that they exist.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
  pub id: Uuid,
  pub name: String,
  pub email: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Address {
  pub id: Uuid,
  pub user_id: Uuid,
  pub full_name: String,
  pub phone_no: String,
  pub address_line: String,
  pub city: String,
  pub state: String,
  pub country: String,
  pub postal_code: String,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub stock: i32,
}
