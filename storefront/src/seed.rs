// storefront/src/seed.rs

use crate::db::{Store, StoreResult};
use crate::models::NewProduct;
use rust_decimal::Decimal;
use tracing::info;

fn sample_catalog() -> Vec<NewProduct> {
  [
    ("Ceramic Mug", "350 ml stoneware mug.", 1000, 10),
    ("Notebook", "A5 dotted notebook, 120 pages.", 1250, 25),
    ("Desk Lamp", "LED lamp with adjustable arm.", 3999, 4),
    ("Gel Pen", "0.5 mm black gel pen.", 550, 5),
  ]
  .into_iter()
  .map(|(name, description, price_cents, available_count)| NewProduct {
    name: name.to_string(),
    description: description.to_string(),
    price: Decimal::new(price_cents, 2),
    available_count,
  })
  .collect()
}

/// Inserts the sample catalog when the store has no products yet.
/// Returns how many products were created.
pub async fn seed_catalog(store: &dyn Store) -> StoreResult<usize> {
  if !store.list_products().await?.is_empty() {
    info!("Catalog already populated; skipping seed.");
    return Ok(0);
  }

  let products = sample_catalog();
  let count = products.len();
  for product in products {
    store.create_product(product).await?;
  }
  info!(count, "Seeded sample catalog.");
  Ok(count)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::MemoryStore;

  #[tokio::test]
  async fn seeds_only_an_empty_catalog() {
    let store = MemoryStore::new();
    assert_eq!(seed_catalog(&store).await.unwrap(), 4);
    assert_eq!(seed_catalog(&store).await.unwrap(), 0);
    assert_eq!(store.list_products().await.unwrap().len(), 4);
  }
}
