// tests/context_management_tests.rs
mod common;

use common::*;
use serial_test::serial;
use storefront_flow::{ContextData, FlowError, Pipeline, PipelineControl};

#[tokio::test]
#[serial]
async fn test_context_data_is_shared_between_steps() {
  setup_tracing();
  let mut pipeline = Pipeline::<ReservationContext, TestError>::new(&[("claim", false, None), ("double_check", false, None)]);

  pipeline.on_root("claim", |ctx: ContextData<ReservationContext>| async move {
    let mut guard = ctx.write();
    guard.reserved = 10;
    guard.notes = "claimed".to_string();
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  pipeline.on_root("double_check", |ctx: ContextData<ReservationContext>| async move {
    let mut guard = ctx.write();
    assert_eq!(guard.reserved, 10);
    guard.reserved += 5;
    guard.notes.push_str(";checked");
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(ReservationContext::default());
  pipeline.run(ctx.clone()).await.unwrap();

  let guard = ctx.read();
  assert_eq!(guard.reserved, 15);
  assert_eq!(guard.notes, "claimed;checked");
}

#[tokio::test]
#[serial]
async fn test_context_data_clone_shares_data() {
  let original = ContextData::new(ReservationContext {
    reserved: 1,
    ..Default::default()
  });
  let cloned = original.clone();

  original.write().reserved = 5;
  assert_eq!(cloned.read().reserved, 5);

  cloned.write().reserved = 10;
  assert_eq!(*original.map_read(|d| &d.reserved), 10);
}

#[tokio::test]
#[serial]
async fn test_handler_releases_lock_before_await() {
  setup_tracing();
  let mut pipeline = Pipeline::<ReservationContext, TestError>::new(&[("slow_claim", false, None)]);

  pipeline.on_root("slow_claim", |ctx: ContextData<ReservationContext>| async move {
    let current = ctx.read().reserved;
    tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    ctx.write().reserved = current + 1;
    Ok::<_, FlowError>(PipelineControl::Continue)
  });

  let ctx = ContextData::new(ReservationContext::default());
  pipeline.run(ctx.clone()).await.unwrap();
  assert_eq!(ctx.read().reserved, 1);
}
