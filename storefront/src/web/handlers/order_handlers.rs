// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::order_service;
use crate::state::AppState;
use crate::web::dto::{parse_hyphenated_uuid, CreateOrderRequest, OrderView};

#[instrument(name = "handler::create_order", skip(app_state, payload))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let request = payload.into_inner().validate()?;
  info!(
    customer_id = %request.customer_id,
    lines = request.lines.len(),
    "Placing order."
  );

  match order_service::place_order(&app_state, request).await {
    Ok(order) => {
      info!(order_id = %order.id, order_total = %order.order_total, "Order placed.");
      Ok(HttpResponse::Created().json(OrderView::from(order)))
    }
    Err(app_err) => {
      warn!("Order placement failed: {}", app_err);
      Err(app_err)
    }
  }
}

#[instrument(name = "handler::get_order", skip(app_state, path), fields(order_id = %path.as_str()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let order_id = parse_uuid(&path)?;
  let order = order_service::get_order(app_state.store.as_ref(), order_id).await?;
  Ok(HttpResponse::Ok().json(OrderView::from(order)))
}

fn parse_uuid(raw: &str) -> Result<Uuid, AppError> {
  parse_hyphenated_uuid(raw).ok_or_else(|| AppError::Validation("Validation failed (uuid is expected)".to_string()))
}
