// storefront/src/pipelines/mod.rs

//! Pipelines run through the application's [`PipelineRegistry`].

use crate::errors::AppError;
use storefront_flow::PipelineRegistry;

pub mod contexts;
pub mod place_order_pipeline;

/// Registers every application pipeline. Called once while building `AppState`.
pub fn register_all_pipelines(registry: &PipelineRegistry<AppError>) {
  tracing::info!("Registering pipelines...");
  place_order_pipeline::register_place_order_pipeline(registry);
  tracing::info!("All application pipelines registered.");
}
