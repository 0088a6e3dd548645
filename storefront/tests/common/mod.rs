// tests/common/mod.rs
#![allow(dead_code)]

use chrono::Utc;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::db::{MemoryStore, Store};
use storefront::models::{OrderRequest, Product, RequestedLine};
use storefront::state::AppState;
use tracing::Level;
use uuid::Uuid;

pub fn product(id: i32, name: &str, price: Decimal, available_count: i32) -> Product {
  let now = Utc::now();
  Product {
    id,
    name: name.to_string(),
    description: format!("{} description", name),
    price,
    available_count,
    created_at: now,
    updated_at: now,
  }
}

/// Mug (id 1, 10.00, 10 left), Notebook (id 2, 12.50, 0 left), Pen (id 4, 5.50, 5 left).
pub fn sample_products() -> Vec<Product> {
  vec![
    product(1, "Mug", Decimal::new(1000, 2), 10),
    product(2, "Notebook", Decimal::new(1250, 2), 0),
    product(4, "Pen", Decimal::new(550, 2), 5),
  ]
}

pub fn memory_state(products: Vec<Product>) -> (AppState, Arc<dyn Store>) {
  let store: Arc<dyn Store> = Arc::new(MemoryStore::with_products(products));
  (AppState::new(store.clone()), store)
}

pub fn order_request(lines: &[(i32, i32)]) -> OrderRequest {
  OrderRequest {
    customer_id: Uuid::new_v4(),
    lines: lines
      .iter()
      .map(|&(product_id, quantity)| RequestedLine { product_id, quantity })
      .collect(),
  }
}

pub async fn stock_of(store: &dyn Store, product_id: i32) -> i32 {
  store
    .find_product(product_id)
    .await
    .unwrap()
    .map(|p| p.available_count)
    .unwrap_or_else(|| panic!("product {} missing", product_id))
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
