// storefront/src/web/routes.rs

use actix_web::error::JsonPayloadError;
use actix_web::{web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{health_handlers, order_handlers, product_handlers};

/// Malformed or mistyped JSON bodies get the same error shape as every other 400.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  tracing::warn!(error = %err, "Rejected JSON payload.");
  AppError::Validation(format!("Invalid request body: {}", err)).into()
}

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/health", web::get().to(health_handlers::health_check_handler))
    .service(
      web::scope("/products")
        .route("", web::get().to(product_handlers::list_products_handler))
        .route("", web::post().to(product_handlers::create_product_handler))
        .route("/{product_id}", web::get().to(product_handlers::get_product_handler)),
    )
    .service(
      web::scope("/orders")
        .route("", web::post().to(order_handlers::create_order_handler))
        .route("/{order_id}", web::get().to(order_handlers::get_order_handler)),
    );
}
