// storefront/src/db/postgres.rs

use super::{Store, StoreError, StoreResult};
use crate::config::DatabaseConfig;
use crate::models::{NewOrder, NewProduct, Order, OrderItem, OrderStatus, Product};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use std::collections::BTreeMap;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

const PRODUCT_COLUMNS: &str = "id, name, description, price, available_count, created_at, updated_at";

#[derive(FromRow)]
struct OrderRow {
  id: Uuid,
  customer_id: Uuid,
  status: OrderStatus,
  order_total: Decimal,
  order_created_date: DateTime<Utc>,
  order_updated_date: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderItemRow {
  line_number: i32,
  product_id: i32,
  quantity: i32,
  price_at_order: Decimal,
  product_name: String,
}

/// PostgreSQL-backed [`Store`].
#[derive(Debug, Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
    let pool = PgPoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(config.acquire_timeout)
      .connect(&config.url)
      .await
      .map_err(|e| {
        error!("Failed to connect to the database: {}", e);
        StoreError::Sqlx(e)
      })?;
    Ok(Self { pool })
  }

  /// Wraps an existing pool, e.g. one shared with other components.
  pub fn from_pool(pool: PgPool) -> Self {
    Self { pool }
  }

  pub async fn migrate(&self) -> StoreResult<()> {
    sqlx::migrate!("./migrations").run(&self.pool).await?;
    Ok(())
  }
}

#[async_trait]
impl Store for PgStore {
  fn backend_name(&self) -> &'static str {
    "postgres"
  }

  #[instrument(name = "postgres.list_products", skip(self))]
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC"))
      .fetch_all(&self.pool)
      .await?;
    Ok(products)
  }

  #[instrument(name = "postgres.find_product", skip(self))]
  async fn find_product(&self, id: i32) -> StoreResult<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(product)
  }

  #[instrument(name = "postgres.find_products_by_ids", skip(self))]
  async fn find_products_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1) ORDER BY id ASC"
    ))
    .bind(ids)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  #[instrument(name = "postgres.create_product", skip(self, product), fields(name = %product.name))]
  async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
    let created = sqlx::query_as::<_, Product>(&format!(
      "INSERT INTO products (name, description, price, available_count) VALUES ($1, $2, $3, $4) RETURNING {PRODUCT_COLUMNS}"
    ))
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price)
    .bind(product.available_count)
    .fetch_one(&self.pool)
    .await?;
    Ok(created)
  }

  #[instrument(
    name = "postgres.commit_order",
    skip(self, order),
    fields(customer_id = %order.customer_id, item_count = order.items.len())
  )]
  async fn commit_order(&self, order: NewOrder) -> StoreResult<Uuid> {
    let order_id = Uuid::new_v4();
    let mut tx = self.pool.begin().await?;

    sqlx::query("INSERT INTO orders (id, customer_id, status, order_total) VALUES ($1, $2, $3, $4)")
      .bind(order_id)
      .bind(order.customer_id)
      .bind(order.status)
      .bind(order.order_total)
      .execute(&mut *tx)
      .await?;

    let mut product_ids = Vec::with_capacity(order.items.len());
    let mut quantities = Vec::with_capacity(order.items.len());
    let mut prices = Vec::with_capacity(order.items.len());
    for item in &order.items {
      product_ids.push(item.product_id);
      quantities.push(item.quantity);
      prices.push(item.price_at_order);
    }

    // Single batch insert; WITH ORDINALITY numbers the lines in request order.
    sqlx::query(
      r#"
      INSERT INTO order_items (order_id, line_number, product_id, quantity, price_at_order)
      SELECT $1, line.line_number::INTEGER, line.product_id, line.quantity, line.price_at_order
      FROM UNNEST($2::INTEGER[], $3::INTEGER[], $4::NUMERIC[])
        WITH ORDINALITY AS line(product_id, quantity, price_at_order, line_number)
      "#,
    )
    .bind(order_id)
    .bind(&product_ids)
    .bind(&quantities)
    .bind(&prices)
    .execute(&mut *tx)
    .await?;

    // One conditional decrement per product, in id order so that concurrent
    // orders lock rows in the same sequence.
    let mut demand: BTreeMap<i32, i32> = BTreeMap::new();
    for item in &order.items {
      *demand.entry(item.product_id).or_default() += item.quantity;
    }

    for (product_id, quantity) in demand {
      let result = sqlx::query(
        "UPDATE products SET available_count = available_count - $1, updated_at = NOW() \
         WHERE id = $2 AND available_count >= $1",
      )
      .bind(quantity)
      .bind(product_id)
      .execute(&mut *tx)
      .await?;

      if result.rows_affected() == 0 {
        warn!(product_id, quantity, "Conditional stock decrement matched no row; rolling back order.");
        tx.rollback().await?;
        return Err(StoreError::StockDepleted { product_id });
      }
    }

    tx.commit().await?;
    debug!(%order_id, "Order committed.");
    Ok(order_id)
  }

  #[instrument(name = "postgres.find_order", skip(self))]
  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
    let Some(row) = sqlx::query_as::<_, OrderRow>(
      "SELECT id, customer_id, status, order_total, order_created_date, order_updated_date \
       FROM orders WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?
    else {
      return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItemRow>(
      "SELECT oi.line_number, oi.product_id, oi.quantity, oi.price_at_order, p.name AS product_name \
       FROM order_items oi JOIN products p ON p.id = oi.product_id \
       WHERE oi.order_id = $1 ORDER BY oi.line_number ASC",
    )
    .bind(id)
    .fetch_all(&self.pool)
    .await?;

    Ok(Some(Order {
      id: row.id,
      customer_id: row.customer_id,
      status: row.status,
      order_total: row.order_total,
      order_created_date: row.order_created_date,
      order_updated_date: row.order_updated_date,
      items: items
        .into_iter()
        .map(|item| OrderItem {
          order_id: row.id,
          line_number: item.line_number,
          product_id: item.product_id,
          quantity: item.quantity,
          price_at_order: item.price_at_order,
          product_name: item.product_name,
        })
        .collect(),
    }))
  }

  async fn ping(&self) -> StoreResult<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }

  async fn close(&self) {
    self.pool.close().await;
  }
}
