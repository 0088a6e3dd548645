// storefront/src/models/money.rs

//! Upper bounds of the money columns. Both stay within 15 significant
//! digits, so amounts survive the JSON number round trip exactly.

use rust_decimal::Decimal;

/// `products.price` and `order_items.price_at_order` are `NUMERIC(12,2)`.
pub fn max_unit_price() -> Decimal {
  Decimal::new(9_999_999_999_99, 2)
}

/// `orders.order_total` is `NUMERIC(14,2)`.
pub fn max_order_total() -> Decimal {
  Decimal::new(999_999_999_999_99, 2)
}
