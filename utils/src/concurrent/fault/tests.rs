#[cfg(test)]
mod test {
  use std::env;

  use tracing_subscriber::EnvFilter;

  use crate::concurrent::fault::{contain, contain_sync, Guarded};

  fn init_tracing() {
    env::set_var("RUST_LOG", "debug");
    let _ = tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .try_init();
  }

  #[tokio::test]
  async fn test_contain_completed() {
    init_tracing();
    let outcome = contain(|| async { Ok::<(), String>(()) }).await;
    assert_eq!(outcome, Guarded::Completed);
  }

  #[tokio::test]
  async fn test_contain_suppresses_error() {
    init_tracing();
    let outcome = contain(|| async { Err::<(), _>("boom") }).await;
    assert!(outcome.is_suppressed());
  }

  #[tokio::test]
  async fn test_contain_suppresses_panic_in_future() {
    init_tracing();
    let outcome = contain(|| async {
      if true {
        panic!("boom");
      }
      Ok::<(), ()>(())
    })
    .await;
    assert!(outcome.is_suppressed());
  }

  #[tokio::test]
  async fn test_contain_suppresses_panic_before_future() {
    init_tracing();
    let outcome = contain(|| -> futures::future::Ready<Result<(), ()>> { panic!("boom") }).await;
    assert!(outcome.is_suppressed());
  }

  #[test]
  fn test_contain_sync() {
    assert!(contain_sync(|| Ok::<(), ()>(())).is_completed());
    assert!(contain_sync(|| Err::<(), _>(42)).is_suppressed());
    assert!(contain_sync(|| -> Result<(), ()> { panic!("boom") }).is_suppressed());
  }
}
