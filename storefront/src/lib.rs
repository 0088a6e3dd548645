// storefront/src/lib.rs

//! Product catalog and order service.
//!
//! Orders are placed through the `place_order` pipeline (see
//! [`pipelines::place_order_pipeline`]) and persisted through a [`db::Store`].

pub mod config;
pub mod db;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod seed;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod web;
