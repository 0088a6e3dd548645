// storefront/src/web/dto.rs

//! Wire formats of the HTTP API. Request payloads are validated into domain
//! types with `validate`, which reports every invalid field at once.

use crate::errors::ValidationErrors;
use crate::models::money::max_unit_price;
use crate::models::{NewProduct, Order, OrderRequest, OrderStatus, RequestedLine};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
  pub id: i64,
  pub quantity: i64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
  pub customer_id: String,
  #[serde(default)]
  pub products: Vec<OrderLinePayload>,
}

impl CreateOrderRequest {
  pub fn validate(self) -> Result<OrderRequest, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let customer_id = match parse_hyphenated_uuid(self.customer_id.trim()) {
      Some(id) => id,
      None => {
        errors.add("customerId", "customerId must be a UUID");
        Uuid::nil()
      }
    };

    if self.products.is_empty() {
      errors.add("products", "products must contain at least 1 element");
    }

    let mut lines = Vec::with_capacity(self.products.len());
    for (idx, line) in self.products.iter().enumerate() {
      let product_id = positive_i32(line.id);
      if product_id.is_none() {
        errors.add(format!("products[{idx}].id"), "id must be a positive integer");
      }
      let quantity = positive_i32(line.quantity);
      if quantity.is_none() {
        errors.add(format!("products[{idx}].quantity"), "quantity must be a positive integer");
      }
      if let (Some(product_id), Some(quantity)) = (product_id, quantity) {
        lines.push(RequestedLine { product_id, quantity });
      }
    }

    errors.into_result(OrderRequest { customer_id, lines })
  }
}

/// Accepts only the canonical 36-character hyphenated form, not the braced,
/// simple or `urn:uuid:` forms.
pub fn parse_hyphenated_uuid(raw: &str) -> Option<Uuid> {
  if raw.len() != 36 {
    return None;
  }
  Uuid::try_parse(raw).ok()
}

fn positive_i32(value: i64) -> Option<i32> {
  i32::try_from(value).ok().filter(|v| *v > 0)
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
  pub name: String,
  #[serde(default)]
  pub description: String,
  #[serde(with = "rust_decimal::serde::float")]
  pub price: Decimal,
  pub available_count: i64,
}

impl CreateProductRequest {
  pub fn validate(self) -> Result<NewProduct, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let name = self.name.trim().to_string();
    if name.is_empty() {
      errors.add("name", "name should not be empty");
    }

    if self.price < Decimal::ZERO {
      errors.add("price", "price must not be less than 0");
    } else if self.price.normalize().scale() > 2 {
      errors.add("price", "price must have at most 2 decimal places");
    } else if self.price > max_unit_price() {
      errors.add("price", "price is too large");
    }

    let available_count = match i32::try_from(self.available_count) {
      Ok(count) if count >= 0 => count,
      _ => {
        errors.add("availableCount", "availableCount must be a non-negative integer");
        0
      }
    };

    errors.into_result(NewProduct {
      name,
      description: self.description.trim().to_string(),
      price: self.price.normalize(),
      available_count,
    })
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineView {
  pub id: i32,
  pub quantity: i32,
  pub name: String,
}

/// The order as returned by `POST /orders` and `GET /orders/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
  pub id: Uuid,
  pub customer_id: Uuid,
  pub order_created_date: DateTime<Utc>,
  pub order_updated_date: DateTime<Utc>,
  pub status: OrderStatus,
  #[serde(with = "rust_decimal::serde::float")]
  pub order_total: Decimal,
  pub products: Vec<OrderLineView>,
}

impl From<Order> for OrderView {
  fn from(order: Order) -> Self {
    Self {
      id: order.id,
      customer_id: order.customer_id,
      order_created_date: order.order_created_date,
      order_updated_date: order.order_updated_date,
      status: order.status,
      order_total: order.order_total,
      products: order
        .items
        .into_iter()
        .map(|item| OrderLineView {
          id: item.product_id,
          quantity: item.quantity,
          name: item.product_name,
        })
        .collect(),
    }
  }
}
