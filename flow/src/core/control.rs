// storefront-flow/src/core/control.rs

//! Signals for controlling pipeline flow and the outcome of a run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineControl {
  /// Keep going with the remaining handlers and steps.
  Continue,
  /// Halt the run. No further handlers of this or any later step execute.
  Stop,
}

/// Outcome of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (or was skipped) to the end.
  Completed,
  /// A handler returned `PipelineControl::Stop`.
  Stopped,
}
