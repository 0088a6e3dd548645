// tests/postgres_store_tests.rs
//
// Runs against a throwaway PostgreSQL container; needs Docker:
//   cargo test -p storefront --test postgres_store_tests -- --ignored
mod common;

use common::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront::db::{PgStore, Store, StoreError};
use storefront::models::{NewOrder, NewOrderItem, NewProduct, OrderStatus};
use storefront::services::order_service::place_order;
use storefront::state::AppState;
use testcontainers::runners::AsyncRunner;
use testcontainers::ContainerAsync;
use testcontainers_modules::postgres::Postgres;
use uuid::Uuid;

async fn start_store() -> (ContainerAsync<Postgres>, PgStore) {
  let container = Postgres::default().start().await.expect("start postgres container");
  let host = container.get_host().await.expect("container host");
  let port = container.get_host_port_ipv4(5432).await.expect("container port");
  let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

  let pool = sqlx::postgres::PgPoolOptions::new()
    .max_connections(8)
    .connect(&url)
    .await
    .expect("connect to postgres");
  let store = PgStore::from_pool(pool);
  store.migrate().await.expect("run migrations");
  (container, store)
}

async fn create(store: &PgStore, name: &str, price: Decimal, available_count: i32) -> i32 {
  store
    .create_product(NewProduct {
      name: name.to_string(),
      description: String::new(),
      price,
      available_count,
    })
    .await
    .expect("create product")
    .id
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pg_place_and_fetch_order() {
  setup_tracing();
  let (_container, store) = start_store().await;
  let mug = create(&store, "Mug", Decimal::new(1000, 2), 10).await;
  let pen = create(&store, "Pen", Decimal::new(550, 2), 5).await;

  let store: Arc<dyn Store> = Arc::new(store);
  let state = AppState::new(store.clone());
  let order = place_order(&state, order_request(&[(pen, 1), (mug, 2)])).await.unwrap();

  assert_eq!(order.status, OrderStatus::Dispatched);
  assert_eq!(order.order_total, Decimal::new(2550, 2));
  let lines: Vec<_> = order.items.iter().map(|i| (i.line_number, i.product_id, i.product_name.as_str())).collect();
  assert_eq!(lines, vec![(1, pen, "Pen"), (2, mug, "Mug")]);
  assert_eq!(stock_of(store.as_ref(), mug).await, 8);
  assert_eq!(stock_of(store.as_ref(), pen).await, 4);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_pg_commit_rolls_back_on_depleted_stock() {
  setup_tracing();
  let (_container, store) = start_store().await;
  let mug = create(&store, "Mug", Decimal::new(1000, 2), 10).await;
  let pen = create(&store, "Pen", Decimal::new(550, 2), 1).await;

  let err = store
    .commit_order(NewOrder {
      customer_id: Uuid::new_v4(),
      status: OrderStatus::Dispatched,
      order_total: Decimal::new(3100, 2),
      items: vec![
        NewOrderItem { product_id: mug, quantity: 2, price_at_order: Decimal::new(1000, 2) },
        NewOrderItem { product_id: pen, quantity: 2, price_at_order: Decimal::new(550, 2) },
      ],
    })
    .await
    .unwrap_err();

  assert!(matches!(err, StoreError::StockDepleted { product_id } if product_id == pen));
  assert_eq!(stock_of(&store, mug).await, 10);
  assert_eq!(stock_of(&store, pen).await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires Docker"]
async fn test_pg_concurrent_orders_never_oversell() {
  setup_tracing();
  let (_container, store) = start_store().await;
  let mug = create(&store, "Mug", Decimal::new(1000, 2), 3).await;

  let store: Arc<dyn Store> = Arc::new(store);
  let state = AppState::new(store.clone());
  let tasks: Vec<_> = (0..10)
    .map(|_| {
      let state = state.clone();
      tokio::spawn(async move { place_order(&state, order_request(&[(mug, 1)])).await })
    })
    .collect();

  let mut successes = 0;
  for task in tasks {
    if task.await.unwrap().is_ok() {
      successes += 1;
    }
  }

  assert_eq!(successes, 3);
  assert_eq!(stock_of(store.as_ref(), mug).await, 0);
}
