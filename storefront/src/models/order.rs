// storefront/src/models/order.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::Type as SqlxType;
use uuid::Uuid;

/// Mirrors the `order_status` Postgres enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
  Pending,
  Dispatched,
  Delivered,
  Canceled,
}

/// One persisted line of an order.
///
/// `price_at_order` is the unit price charged when the order was placed and
/// is never recomputed. `product_name` is looked up live on every read.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
  pub order_id: Uuid,
  pub line_number: i32,
  pub product_id: i32,
  pub quantity: i32,
  pub price_at_order: Decimal,
  pub product_name: String,
}

/// A persisted order together with its items in line order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub status: OrderStatus,
  pub order_total: Decimal,
  pub order_created_date: DateTime<Utc>,
  pub order_updated_date: DateTime<Utc>,
  pub items: Vec<OrderItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
  pub product_id: i32,
  pub quantity: i32,
  pub price_at_order: Decimal,
}

/// Everything `Store::commit_order` needs to write an order atomically.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
  pub customer_id: Uuid,
  pub status: OrderStatus,
  pub order_total: Decimal,
  pub items: Vec<NewOrderItem>,
}

/// One requested line: `quantity` units of product `product_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedLine {
  pub product_id: i32,
  pub quantity: i32,
}

/// A customer's request to place an order, lines in the order they were given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
  pub customer_id: Uuid,
  pub lines: Vec<RequestedLine>,
}

impl OrderRequest {
  /// Distinct product ids in first-seen order.
  pub fn distinct_product_ids(&self) -> Vec<i32> {
    let mut ids = Vec::with_capacity(self.lines.len());
    for line in &self.lines {
      if !ids.contains(&line.product_id) {
        ids.push(line.product_id);
      }
    }
    ids
  }
}
