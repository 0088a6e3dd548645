// storefront/src/pipelines/contexts.rs

//! Data structs the pipelines operate on, wrapped in `ContextData` at run time.

use crate::db::Store;
use crate::models::{NewOrderItem, Order, OrderRequest, Product};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// State of one order placement, filled in step by step.
#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub store: Arc<dyn Store>,
  pub request: OrderRequest,
  /// Products named by the request, keyed by id, as read before any write.
  pub products: HashMap<i32, Product>,
  pub priced_items: Vec<NewOrderItem>,
  pub order_total: Decimal,
  pub placed_order_id: Option<Uuid>,
  pub placed_order: Option<Order>,
}

impl PlaceOrderCtxData {
  pub fn new(store: Arc<dyn Store>, request: OrderRequest) -> Self {
    Self {
      store,
      request,
      products: HashMap::new(),
      priced_items: Vec::new(),
      order_total: Decimal::ZERO,
      placed_order_id: None,
      placed_order: None,
    }
  }
}
