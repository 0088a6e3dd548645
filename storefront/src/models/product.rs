// storefront/src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

/// A catalog entry. `available_count` never drops below zero.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
  pub id: i32,
  pub name: String,
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub available_count: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// A validated product ready to be inserted; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
  pub name: String,
  pub description: String,
  pub price: Decimal,
  pub available_count: i32,
}
