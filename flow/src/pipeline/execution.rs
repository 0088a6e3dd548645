// storefront-flow/src/pipeline/execution.rs

//! `Pipeline::run()`: executes the steps and their handlers in order.

use crate::core::context_data::ContextData;
use crate::core::control::{PipelineControl, PipelineResult};
use crate::core::handler::Handler;
use crate::core::step::StepDef;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;
use tracing::{event, info_span, Instrument, Level};

impl<TData, Err> Pipeline<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Executes the pipeline against `ctx_data`.
  ///
  /// Returns `Completed` when every step ran or was skipped, `Stopped` when a
  /// handler returned `PipelineControl::Stop`, and the first handler error
  /// otherwise. A non-optional step without any handler fails with
  /// `FlowError::HandlerMissing` converted into `Err`.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    let run_span = info_span!(
      "pipeline_run",
      context_data_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    );
    self.run_steps(ctx_data).instrument(run_span).await
  }

  async fn run_steps(&self, ctx_data: ContextData<TData>) -> Result<PipelineResult, Err> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = info_span!(
        "pipeline_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional,
      );
      let control = self.run_step(step_def, ctx_data.clone()).instrument(step_span).await?;
      if control == PipelineControl::Stop {
        return Ok(PipelineResult::Stopped);
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: ContextData<TData>) -> Result<PipelineControl, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_cond_fn) = &step_def.skip_if {
      if skip_cond_fn(ctx_data.clone()) {
        event!(Level::INFO, "Step skipped due to 'skip_if' condition.");
        return Ok(PipelineControl::Continue);
      }
    }

    let phases: [(&'static str, Option<&Vec<Handler<TData, Err>>>); 3] = [
      ("before", self.before.get(step_name)),
      ("on", self.on.get(step_name)),
      ("after", self.after.get(step_name)),
    ];

    let has_handlers = phases.iter().any(|(_, handlers)| handlers.is_some_and(|v| !v.is_empty()));
    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PipelineControl::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(FlowError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase, handlers) in phases {
      let Some(handlers) = handlers else { continue };
      for handler_fn in handlers {
        match handler_fn(ctx_data.clone()).await {
          Ok(PipelineControl::Continue) => {}
          Ok(PipelineControl::Stop) => {
            event!(Level::INFO, phase, "Pipeline stopped by a handler.");
            return Ok(PipelineControl::Stop);
          }
          Err(e) => {
            event!(Level::WARN, phase, error = %e, "Handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Step finished.");
    Ok(PipelineControl::Continue)
  }
}
