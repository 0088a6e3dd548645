// storefront/src/services/mod.rs

pub mod order_service;
pub mod product_service;
