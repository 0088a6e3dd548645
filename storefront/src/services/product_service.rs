// storefront/src/services/product_service.rs

use crate::db::Store;
use crate::errors::{AppError, Result};
use crate::models::{NewProduct, Product};
use tracing::{info, instrument};

#[instrument(name = "service::list_products", skip(store))]
pub async fn list_products(store: &dyn Store) -> Result<Vec<Product>> {
  let products = store.list_products().await?;
  info!("Fetched {} products.", products.len());
  Ok(products)
}

#[instrument(name = "service::get_product", skip(store))]
pub async fn get_product(store: &dyn Store, product_id: i32) -> Result<Product> {
  store
    .find_product(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Product with ID \"{}\" not found.", product_id)))
}

#[instrument(name = "service::create_product", skip(store, product), fields(name = %product.name))]
pub async fn create_product(store: &dyn Store, product: NewProduct) -> Result<Product> {
  let created = store.create_product(product).await?;
  info!(product_id = created.id, "Product created.");
  Ok(created)
}
