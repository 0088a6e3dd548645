// storefront/src/db/mod.rs

//! Storage for the catalog and for orders.
//!
//! The rest of the application only talks to [`Store`]. A handle is built
//! once at startup with [`connect`], shared as `Arc<dyn Store>`, and closed
//! on shutdown.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::config::DatabaseConfig;
use crate::models::{NewOrder, NewProduct, Order, Product};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// `DATABASE_URL` value that selects [`MemoryStore`].
pub const MEMORY_URL: &str = "memory://";

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Database migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  /// A floor-checked decrement matched no row: a concurrent order took the
  /// stock between the pre-check and the commit. The transaction was rolled back.
  #[error("Stock for product {product_id} was depleted while the order was being committed")]
  StockDepleted { product_id: i32 },

  #[error("Product {product_id} disappeared while the order was being committed")]
  UnknownProduct { product_id: i32 },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync + 'static {
  fn backend_name(&self) -> &'static str;

  /// All products, ordered by id.
  async fn list_products(&self) -> StoreResult<Vec<Product>>;

  async fn find_product(&self, id: i32) -> StoreResult<Option<Product>>;

  /// One lookup for a set of ids. Duplicates in `ids` are fine; unknown ids are
  /// simply absent from the result.
  async fn find_products_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Product>>;

  async fn create_product(&self, product: NewProduct) -> StoreResult<Product>;

  /// Writes the order, its items and the stock decrements in one transaction.
  ///
  /// Each product's `available_count` is decremented only if it stays
  /// non-negative. If any decrement fails the whole transaction is rolled back
  /// and [`StoreError::StockDepleted`] is returned.
  async fn commit_order(&self, order: NewOrder) -> StoreResult<Uuid>;

  /// The order with its items in line order and each product's current name.
  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>>;

  async fn ping(&self) -> StoreResult<()>;

  async fn close(&self);
}

/// Builds the storage handle described by `config`, running migrations first
/// when the backend is PostgreSQL and `run_migrations` is set.
pub async fn connect(config: &DatabaseConfig) -> StoreResult<Arc<dyn Store>> {
  if config.url.starts_with(MEMORY_URL) {
    info!("Using the in-memory store; nothing will be persisted.");
    return Ok(Arc::new(MemoryStore::new()));
  }

  let store = PgStore::connect(config).await?;
  info!("Successfully connected to the database.");
  if config.run_migrations {
    store.migrate().await?;
    info!("Database migrations applied.");
  }
  Ok(Arc::new(store))
}
