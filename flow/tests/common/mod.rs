// tests/common/mod.rs
#![allow(dead_code)]

use once_cell::sync::Lazy;
use storefront_flow::{ContextData, FlowError, Handler, PipelineControl};
use tracing::Level;

/// A toy stock reservation: each step claims some units and records itself.
#[derive(Clone, Debug, Default)]
pub struct ReservationContext {
  pub reserved: i32,
  pub notes: String,
  pub steps_executed: Vec<String>,
  pub stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  // FlowError is neither Clone nor PartialEq, so keep its Debug rendering.
  #[error("Flow error: {0}")]
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub fn reserve_handler(step_name: &'static str, units: i32) -> Handler<ReservationContext, TestError> {
  Box::new(move |ctx: ContextData<ReservationContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.reserved += units;
      guard.notes.push_str(&format!("{}+{};", step_name, units));
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, reserved = guard.reserved, "reserved");
      if guard.stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  })
}

pub fn failing_handler(step_name: &'static str, error_message: &'static str) -> Handler<ReservationContext, TestError> {
  Box::new(move |ctx: ContextData<ReservationContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
