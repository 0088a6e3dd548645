// storefront/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::state::AppState;

/// Reports `ok` once the store answers a trivial query.
#[instrument(name = "handler::health_check", skip(app_state), fields(backend = app_state.store.backend_name()))]
pub async fn health_check_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  app_state.store.ping().await?;
  Ok(HttpResponse::Ok().json(json!({ "status": "ok" })))
}
