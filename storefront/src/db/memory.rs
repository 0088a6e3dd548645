// storefront/src/db/memory.rs

use super::{Store, StoreError, StoreResult};
use crate::models::{NewOrder, NewOrderItem, NewProduct, Order, OrderItem, OrderStatus, Product};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, warn};
use uuid::Uuid;

struct StoredOrder {
  customer_id: Uuid,
  status: OrderStatus,
  order_total: Decimal,
  created_at: DateTime<Utc>,
  items: Vec<NewOrderItem>,
}

#[derive(Default)]
struct Inner {
  products: BTreeMap<i32, Product>,
  last_product_id: i32,
  orders: HashMap<Uuid, StoredOrder>,
}

/// In-process [`Store`] with the same transactional guarantees as [`super::PgStore`].
///
/// One mutex guards the whole state, so `commit_order` checks every stock
/// floor and applies every decrement without another order interleaving.
#[derive(Default)]
pub struct MemoryStore {
  inner: Mutex<Inner>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// A store pre-filled with `products`. Ids are kept as given; new products
  /// continue after the highest one.
  pub fn with_products(products: Vec<Product>) -> Self {
    let last_product_id = products.iter().map(|p| p.id).max().unwrap_or(0);
    let products = products.into_iter().map(|p| (p.id, p)).collect();
    Self {
      inner: Mutex::new(Inner {
        products,
        last_product_id,
        orders: HashMap::new(),
      }),
    }
  }
}

#[async_trait]
impl Store for MemoryStore {
  fn backend_name(&self) -> &'static str {
    "memory"
  }

  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    Ok(self.inner.lock().products.values().cloned().collect())
  }

  async fn find_product(&self, id: i32) -> StoreResult<Option<Product>> {
    Ok(self.inner.lock().products.get(&id).cloned())
  }

  async fn find_products_by_ids(&self, ids: &[i32]) -> StoreResult<Vec<Product>> {
    let inner = self.inner.lock();
    Ok(
      inner
        .products
        .values()
        .filter(|p| ids.contains(&p.id))
        .cloned()
        .collect(),
    )
  }

  async fn create_product(&self, product: NewProduct) -> StoreResult<Product> {
    let mut inner = self.inner.lock();
    inner.last_product_id += 1;
    let now = Utc::now();
    let created = Product {
      id: inner.last_product_id,
      name: product.name,
      description: product.description,
      price: product.price,
      available_count: product.available_count,
      created_at: now,
      updated_at: now,
    };
    inner.products.insert(created.id, created.clone());
    Ok(created)
  }

  async fn commit_order(&self, order: NewOrder) -> StoreResult<Uuid> {
    let mut inner = self.inner.lock();

    let mut demand: BTreeMap<i32, i32> = BTreeMap::new();
    for item in &order.items {
      *demand.entry(item.product_id).or_default() += item.quantity;
    }

    for (&product_id, &quantity) in &demand {
      let Some(product) = inner.products.get(&product_id) else {
        warn!(product_id, "Product vanished before the order could be committed.");
        return Err(StoreError::UnknownProduct { product_id });
      };
      if product.available_count < quantity {
        warn!(product_id, quantity, "Stock floor check failed; nothing was written.");
        return Err(StoreError::StockDepleted { product_id });
      }
    }

    let now = Utc::now();
    for (product_id, quantity) in demand {
      if let Some(product) = inner.products.get_mut(&product_id) {
        product.available_count -= quantity;
        product.updated_at = now;
      }
    }

    let order_id = Uuid::new_v4();
    inner.orders.insert(
      order_id,
      StoredOrder {
        customer_id: order.customer_id,
        status: order.status,
        order_total: order.order_total,
        created_at: now,
        items: order.items,
      },
    );
    debug!(%order_id, "Order committed.");
    Ok(order_id)
  }

  async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
    let inner = self.inner.lock();
    let Some(stored) = inner.orders.get(&id) else {
      return Ok(None);
    };

    let items = stored
      .items
      .iter()
      .zip(1..)
      .filter_map(|(item, line_number)| {
        let product = inner.products.get(&item.product_id)?;
        Some(OrderItem {
          order_id: id,
          line_number,
          product_id: item.product_id,
          quantity: item.quantity,
          price_at_order: item.price_at_order,
          product_name: product.name.clone(),
        })
      })
      .collect();

    Ok(Some(Order {
      id,
      customer_id: stored.customer_id,
      status: stored.status,
      order_total: stored.order_total,
      order_created_date: stored.created_at,
      order_updated_date: stored.created_at,
      items,
    }))
  }

  async fn ping(&self) -> StoreResult<()> {
    Ok(())
  }

  async fn close(&self) {}
}

#[cfg(test)]
mod tests {
  use super::*;

  fn product(id: i32, price: Decimal, available_count: i32) -> Product {
    let now = Utc::now();
    Product {
      id,
      name: format!("Product {id}"),
      description: String::new(),
      price,
      available_count,
      created_at: now,
      updated_at: now,
    }
  }

  fn order_for(items: &[(i32, i32)]) -> NewOrder {
    NewOrder {
      customer_id: Uuid::new_v4(),
      status: OrderStatus::Dispatched,
      order_total: Decimal::ZERO,
      items: items
        .iter()
        .map(|&(product_id, quantity)| NewOrderItem {
          product_id,
          quantity,
          price_at_order: Decimal::ONE,
        })
        .collect(),
    }
  }

  #[tokio::test]
  async fn create_product_continues_after_seeded_ids() {
    let store = MemoryStore::with_products(vec![product(7, Decimal::ONE, 1)]);
    let created = store
      .create_product(NewProduct {
        name: "Lamp".into(),
        description: "Desk lamp".into(),
        price: Decimal::new(1999, 2),
        available_count: 3,
      })
      .await
      .unwrap();
    assert_eq!(created.id, 8);
    assert_eq!(store.list_products().await.unwrap().len(), 2);
  }

  #[tokio::test]
  async fn commit_rejects_combined_demand_above_stock() {
    let store = MemoryStore::with_products(vec![product(1, Decimal::ONE, 3)]);
    let err = store.commit_order(order_for(&[(1, 2), (1, 2)])).await.unwrap_err();
    assert!(matches!(err, StoreError::StockDepleted { product_id: 1 }));
    assert_eq!(store.find_product(1).await.unwrap().unwrap().available_count, 3);
  }

  #[tokio::test]
  async fn commit_is_all_or_nothing_across_products() {
    let store = MemoryStore::with_products(vec![product(1, Decimal::ONE, 5), product(2, Decimal::ONE, 0)]);
    assert!(store.commit_order(order_for(&[(1, 1), (2, 1)])).await.is_err());
    assert_eq!(store.find_product(1).await.unwrap().unwrap().available_count, 5);
  }

  #[tokio::test]
  async fn find_order_keeps_line_order_and_live_names() {
    let store = MemoryStore::with_products(vec![product(1, Decimal::ONE, 5), product(2, Decimal::ONE, 5)]);
    let id = store.commit_order(order_for(&[(2, 1), (1, 3)])).await.unwrap();

    store.inner.lock().products.get_mut(&2).unwrap().name = "Renamed".into();

    let order = store.find_order(id).await.unwrap().unwrap();
    let lines: Vec<_> = order
      .items
      .iter()
      .map(|i| (i.line_number, i.product_id, i.product_name.as_str()))
      .collect();
    assert_eq!(lines, vec![(1, 2, "Renamed"), (2, 1, "Product 1")]);
  }
}
