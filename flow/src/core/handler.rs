// storefront-flow/src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::PipelineControl;
use std::future::Future;
use std::pin::Pin;

/// A pipeline step handler.
///
/// Takes a clone of the run's `ContextData<TData>` and resolves to the
/// control signal for the pipeline. Handlers must drop any lock guard
/// obtained from the context before their first `.await`.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>
    + Send
    + Sync,
>;
