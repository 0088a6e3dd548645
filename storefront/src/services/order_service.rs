// storefront/src/services/order_service.rs

use crate::db::Store;
use crate::errors::{AppError, Result};
use crate::models::{Order, OrderRequest};
use crate::pipelines::contexts::PlaceOrderCtxData;
use crate::state::AppState;
use storefront_flow::{ContextData, PipelineResult};
use tracing::{instrument, warn};
use uuid::Uuid;

/// Places an order through the `place_order` pipeline and returns it as persisted.
#[instrument(
  name = "service::place_order",
  skip(app_state, request),
  fields(customer_id = %request.customer_id, lines = request.lines.len())
)]
pub async fn place_order(app_state: &AppState, request: OrderRequest) -> Result<Order> {
  let ctx_data = ContextData::new(PlaceOrderCtxData::new(app_state.store.clone(), request));

  match app_state.pipelines.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let placed = ctx_data.write().placed_order.take();
      placed.ok_or_else(|| AppError::Internal("Order placement completed without a placed order.".to_string()))
    }
    PipelineResult::Stopped => {
      warn!("Order placement pipeline was stopped by a handler.");
      Err(AppError::Internal("Order placement was halted before completion.".to_string()))
    }
  }
}

#[instrument(name = "service::get_order", skip(store))]
pub async fn get_order(store: &dyn Store, order_id: Uuid) -> Result<Order> {
  store
    .find_order(order_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Order with ID \"{}\" not found.", order_id)))
}
