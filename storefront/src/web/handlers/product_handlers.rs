// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use tracing::instrument;

use crate::errors::AppError;
use crate::services::product_service;
use crate::state::AppState;
use crate::web::dto::CreateProductRequest;

#[instrument(name = "handler::list_products", skip(app_state))]
pub async fn list_products_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let products = product_service::list_products(app_state.store.as_ref()).await?;
  Ok(HttpResponse::Ok().json(products))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_str()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let product_id = path
    .parse::<i32>()
    .map_err(|_| AppError::Validation("Validation failed (numeric string is expected)".to_string()))?;
  let product = product_service::get_product(app_state.store.as_ref(), product_id).await?;
  Ok(HttpResponse::Ok().json(product))
}

#[instrument(name = "handler::create_product", skip(app_state, payload))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
  let new_product = payload.into_inner().validate()?;
  let product = product_service::create_product(app_state.store.as_ref(), new_product).await?;
  Ok(HttpResponse::Created().json(product))
}
