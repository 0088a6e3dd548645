// storefront/src/models/mod.rs

//! Domain entities as they are persisted by a [`crate::db::Store`].

pub mod money;
pub mod order;
pub mod product;

pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderRequest, OrderStatus, RequestedLine};
pub use product::{NewProduct, Product};
