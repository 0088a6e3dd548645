// storefront/src/pipelines/place_order_pipeline.rs

//! Order placement: every check runs against a single read of the requested
//! products, then the order, its items and the stock decrements are committed
//! in one store transaction.

use crate::errors::AppError;
use crate::models::money::max_order_total;
use crate::models::{NewOrder, NewOrderItem, OrderStatus, Product, RequestedLine};
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::services::order_service;
use rust_decimal::Decimal;
use std::collections::HashMap;
use storefront_flow::{ContextData, Pipeline, PipelineControl, PipelineRegistry};
use tracing::{debug, info, warn};

pub const MISSING_PRODUCTS_MESSAGE: &str = "One or more products specified in the order do not exist.";

pub fn register_place_order_pipeline(registry: &PipelineRegistry<AppError>) {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("validate_order_request", false, None),
    ("load_requested_products", false, None),
    ("check_stock", false, None),
    ("price_order", false, None),
    ("commit_order", false, None),
    ("load_placed_order", false, None),
  ]);

  p.on_root("validate_order_request", validate_order_request);
  p.on_root("load_requested_products", load_requested_products);
  p.on_root("check_stock", check_stock);
  p.on_root("price_order", price_order);
  p.on_root("commit_order", commit_order);
  p.on_root("load_placed_order", load_placed_order);

  registry.register_pipeline(p);
}

async fn validate_order_request(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let guard = ctx_data.read();
  let lines = &guard.request.lines;
  if lines.is_empty() {
    return Err(AppError::Validation("An order must contain at least one product.".to_string()));
  }
  if let Some(line) = lines.iter().find(|l| l.quantity <= 0) {
    return Err(AppError::Validation(format!(
      "Quantity for product {} must be greater than 0.",
      line.product_id
    )));
  }
  Ok(PipelineControl::Continue)
}

async fn load_requested_products(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let (store, ids) = {
    let guard = ctx_data.read();
    (guard.store.clone(), guard.request.distinct_product_ids())
  };

  let found = store.find_products_by_ids(&ids).await?;
  if found.len() != ids.len() {
    warn!(requested = ids.len(), found = found.len(), "Order references unknown products.");
    return Err(AppError::Validation(MISSING_PRODUCTS_MESSAGE.to_string()));
  }

  debug!(count = found.len(), "Requested products loaded.");
  ctx_data.write().products = found.into_iter().map(|p| (p.id, p)).collect();
  Ok(PipelineControl::Continue)
}

async fn check_stock(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let guard = ctx_data.read();
  check_stock_levels(&guard.request.lines, &guard.products)?;
  Ok(PipelineControl::Continue)
}

async fn price_order(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let mut guard = ctx_data.write();
  let (items, total) = price_lines(&guard.request.lines, &guard.products)?;
  debug!(order_total = %total, "Order priced.");
  guard.priced_items = items;
  guard.order_total = total;
  Ok(PipelineControl::Continue)
}

async fn commit_order(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let (store, new_order) = {
    let guard = ctx_data.read();
    (
      guard.store.clone(),
      NewOrder {
        customer_id: guard.request.customer_id,
        status: OrderStatus::Dispatched,
        order_total: guard.order_total,
        items: guard.priced_items.clone(),
      },
    )
  };

  let order_id = store.commit_order(new_order).await?;
  info!(%order_id, "Order committed.");
  ctx_data.write().placed_order_id = Some(order_id);
  Ok(PipelineControl::Continue)
}

async fn load_placed_order(ctx_data: ContextData<PlaceOrderCtxData>) -> Result<PipelineControl, AppError> {
  let (store, order_id) = {
    let guard = ctx_data.read();
    (guard.store.clone(), guard.placed_order_id)
  };
  let order_id =
    order_id.ok_or_else(|| AppError::Internal("Order id missing after the commit step.".to_string()))?;

  let order = order_service::get_order(store.as_ref(), order_id).await?;
  ctx_data.write().placed_order = Some(order);
  Ok(PipelineControl::Continue)
}

/// Walks the lines in request order. Lines naming the same product draw from
/// the same stock, so the reported `Available` is what earlier lines left over.
pub fn check_stock_levels(lines: &[RequestedLine], products: &HashMap<i32, Product>) -> Result<(), AppError> {
  let mut remaining: HashMap<i32, i32> = products.iter().map(|(id, p)| (*id, p.available_count)).collect();

  for line in lines {
    let product = products
      .get(&line.product_id)
      .ok_or_else(|| AppError::Validation(MISSING_PRODUCTS_MESSAGE.to_string()))?;
    let left = remaining.entry(line.product_id).or_insert(0);
    if *left < line.quantity {
      return Err(AppError::Validation(format!(
        "Insufficient stock for product \"{}\". Available: {}, Requested: {}.",
        product.name, *left, line.quantity
      )));
    }
    *left -= line.quantity;
  }
  Ok(())
}

/// Snapshots each line's unit price and sums `price × quantity`. A line or
/// order total above what `orders.order_total` holds is rejected.
pub fn price_lines(
  lines: &[RequestedLine],
  products: &HashMap<i32, Product>,
) -> Result<(Vec<NewOrderItem>, Decimal), AppError> {
  let limit = max_order_total();
  let overflow = || AppError::Validation(format!("Order total exceeds the maximum of {}.", limit));

  let mut total = Decimal::ZERO;
  let mut items = Vec::with_capacity(lines.len());
  for line in lines {
    let product = products
      .get(&line.product_id)
      .ok_or_else(|| AppError::Validation(MISSING_PRODUCTS_MESSAGE.to_string()))?;
    let line_total = product
      .price
      .checked_mul(Decimal::from(line.quantity))
      .filter(|t| *t <= limit)
      .ok_or_else(overflow)?;
    total = total
      .checked_add(line_total)
      .filter(|t| *t <= limit)
      .ok_or_else(overflow)?;
    items.push(NewOrderItem {
      product_id: line.product_id,
      quantity: line.quantity,
      price_at_order: product.price,
    });
  }
  Ok((items, total))
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Utc;

  fn catalog(entries: &[(i32, &str, Decimal, i32)]) -> HashMap<i32, Product> {
    let now = Utc::now();
    entries
      .iter()
      .map(|&(id, name, price, available_count)| {
        (
          id,
          Product {
            id,
            name: name.to_string(),
            description: String::new(),
            price,
            available_count,
            created_at: now,
            updated_at: now,
          },
        )
      })
      .collect()
  }

  fn line(product_id: i32, quantity: i32) -> RequestedLine {
    RequestedLine { product_id, quantity }
  }

  #[test]
  fn price_lines_snapshots_unit_prices_and_sums() {
    let products = catalog(&[(1, "Mug", Decimal::new(1000, 2), 10), (4, "Pen", Decimal::new(550, 2), 5)]);
    let (items, total) = price_lines(&[line(1, 2), line(4, 1)], &products).unwrap();
    assert_eq!(total, Decimal::new(2550, 2));
    assert_eq!(items[0].price_at_order, Decimal::new(1000, 2));
    assert_eq!(items[1].product_id, 4);
  }

  #[test]
  fn price_lines_reports_overflow_as_validation() {
    let products = catalog(&[(1, "Gold", Decimal::MAX, 10)]);
    let err = price_lines(&[line(1, 2)], &products).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  fn vault_catalog() -> HashMap<i32, Product> {
    catalog(&[
      (1, "Vault", Decimal::new(9_999_999_999_99, 2), 1000),
      (2, "Clip", Decimal::new(99, 2), 1000),
    ])
  }

  #[test]
  fn price_lines_accepts_total_at_column_limit() {
    let (_, total) = price_lines(&[line(1, 100), line(2, 1)], &vault_catalog()).unwrap();
    assert_eq!(total, max_order_total());
  }

  #[test]
  fn price_lines_rejects_line_total_above_column_limit() {
    let err = price_lines(&[line(1, 200)], &vault_catalog()).unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m.contains("999999999999.99")));
  }

  #[test]
  fn price_lines_rejects_sum_above_column_limit() {
    let err = price_lines(&[line(1, 100), line(2, 2)], &vault_catalog()).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn stock_check_uses_the_original_message() {
    let products = catalog(&[(1, "Mug", Decimal::ONE, 3)]);
    let err = check_stock_levels(&[line(1, 5)], &products).unwrap_err();
    assert_eq!(
      err.to_string(),
      "Insufficient stock for product \"Mug\". Available: 3, Requested: 5."
    );
  }

  #[test]
  fn stock_check_accumulates_repeated_products() {
    let products = catalog(&[(1, "Mug", Decimal::ONE, 3)]);
    assert!(check_stock_levels(&[line(1, 2), line(1, 1)], &products).is_ok());
    let err = check_stock_levels(&[line(1, 2), line(1, 2)], &products).unwrap_err();
    assert_eq!(
      err.to_string(),
      "Insufficient stock for product \"Mug\". Available: 1, Requested: 2."
    );
  }
}
