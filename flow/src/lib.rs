// storefront-flow/src/lib.rs

//! A small async, type-safe step pipeline engine.
//!
//! A pipeline is an ordered list of named steps. Each step can carry
//! `before`, `on` and `after` handlers that all operate on the same shared
//! [`ContextData`]. Handlers decide whether the run continues or stops, and
//! any handler error ends the run. Pipelines are registered in a
//! [`PipelineRegistry`] keyed by their context data type, so callers only
//! need to hand over a context to have the right process run on it.
//!
//! Typical use:
//!  1. Define a context struct for the process.
//!  2. Create a `Pipeline<MyCtx, MyError>` naming its steps.
//!  3. Attach handlers with `.on_root()`, `.before_root()`, `.after_root()`.
//!  4. Register it with a `PipelineRegistry` and call `registry.run(ctx)`.

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::handler::Handler;
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::Pipeline;
pub use crate::registry::PipelineRegistry;
