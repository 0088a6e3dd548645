// storefront-flow/src/registry.rs

//! `PipelineRegistry<E>`: a registry of pipelines keyed by their context data
//! type. `run` returns results in the application-level error type `E`.

use crate::core::context_data::ContextData;
use crate::core::control::PipelineResult;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

/// Type-erased runner so pipelines over different context types can share one map.
#[async_trait]
trait AnyPipelineRunner<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx_obj` must hold a `ContextData<TData>` for the wrapped pipeline.
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr>;
}

struct PipelineWrapper<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<FlowError> + Send + Sync + 'static,
{
  pipeline: Arc<Pipeline<TData, HandlerErr>>,
  _phantom_app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<TData, HandlerErr, AppErr> AnyPipelineRunner<AppErr> for PipelineWrapper<TData, HandlerErr, AppErr>
where
  TData: 'static + Send + Sync,
  HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<HandlerErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx_obj: Box<dyn Any + Send>) -> Result<PipelineResult, AppErr> {
    let typed_ctx_data = match ctx_obj.downcast::<ContextData<TData>>() {
      Ok(boxed_ctx_data) => *boxed_ctx_data,
      Err(_) => {
        let expected_type = std::any::type_name::<ContextData<TData>>();
        event!(Level::ERROR, expected_type, "Context object type mismatch.");
        return Err(AppErr::from(FlowError::TypeMismatch {
          expected_type: expected_type.to_string(),
        }));
      }
    };

    self.pipeline.run(typed_ctx_data).await.map_err(AppErr::from)
  }
}

/// Registry of pipelines, one per context data type.
///
/// `AppErr` is what `run` returns; it must absorb both the pipelines' handler
/// errors and the registry's own `FlowError`s.
pub struct PipelineRegistry<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn AnyPipelineRunner<AppErr>>>>,
}

impl<AppErr> Default for PipelineRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}

impl<AppErr> PipelineRegistry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for its context data type, replacing any pipeline
  /// previously registered for that type.
  pub fn register_pipeline<TData, HandlerErr>(&self, pipeline: Pipeline<TData, HandlerErr>)
  where
    TData: 'static + Send + Sync,
    HandlerErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<HandlerErr>,
  {
    event!(
      Level::DEBUG,
      tdata_type = %std::any::type_name::<TData>(),
      steps = ?pipeline.step_names(),
      "Registering pipeline."
    );
    let wrapper = PipelineWrapper::<TData, HandlerErr, AppErr> {
      pipeline: Arc::new(pipeline),
      _phantom_app_err: PhantomData,
    };
    self.pipelines.write().insert(TypeId::of::<TData>(), Arc::new(wrapper));
  }

  pub fn is_registered<TData: 'static + Send + Sync>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<TData>())
  }

  /// Runs the pipeline registered for `TData` on `ctx_data`.
  #[instrument(name = "PipelineRegistry::run", skip_all, fields(tdata_type = %std::any::type_name::<TData>()))]
  pub async fn run<TData>(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, AppErr>
  where
    TData: 'static + Send + Sync,
  {
    let runner = self.pipelines.read().get(&TypeId::of::<TData>()).cloned();
    let Some(runner) = runner else {
      let type_name = std::any::type_name::<TData>();
      event!(Level::ERROR, "No pipeline registered for context data type {}.", type_name);
      return Err(AppErr::from(FlowError::NotRegistered {
        type_name: type_name.to_string(),
      }));
    };

    runner.run_erased(Box::new(ctx_data)).await
  }
}
