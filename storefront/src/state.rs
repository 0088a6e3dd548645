// storefront/src/state.rs

use crate::db::Store;
use crate::errors::AppError;
use storefront_flow::PipelineRegistry;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub pipelines: Arc<PipelineRegistry<AppError>>,
}

impl AppState {
  /// Wraps `store` and registers every application pipeline.
  pub fn new(store: Arc<dyn Store>) -> Self {
    let pipelines = Arc::new(PipelineRegistry::<AppError>::new());
    crate::pipelines::register_all_pipelines(&pipelines);
    Self { store, pipelines }
  }
}
