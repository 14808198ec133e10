#[cfg(test)]
mod test {
  use std::env;

  use tokio::time::Duration;
  use tracing_subscriber::EnvFilter;

  use crate::concurrent::ring_buffer::{RingBuffer, RingStats};
  use crate::{Config, ConfigOption};

  fn init_tracing() {
    env::set_var("RUST_LOG", "debug");
    let _ = tracing_subscriber::fmt()
      .with_env_filter(EnvFilter::from_default_env())
      .try_init();
  }

  async fn produce(input: flume::Sender<u32>, count: u32) {
    for i in 0..count {
      input.send_async(i).await.unwrap();
    }
  }

  async fn consume(output: flume::Receiver<u32>) -> Vec<u32> {
    let mut values = Vec::new();
    while let Ok(value) = output.recv_async().await {
      values.push(value);
    }
    values
  }

  #[tokio::test(start_paused = true)]
  async fn test_slow_consumer_sees_recent_values() {
    init_tracing();
    let (input, rx) = flume::bounded(0);
    let (ring_buffer, output) = RingBuffer::new(rx, 1);
    let runner = ring_buffer.spawn();

    let consumer = tokio::spawn(async move {
      tokio::time::sleep(Duration::from_millis(50)).await;
      consume(output).await
    });
    produce(input, 10).await;

    let observed = consumer.await.unwrap();
    let stats = runner.await.unwrap();

    assert_eq!(observed.last(), Some(&9));
    assert!(observed.windows(2).all(|w| w[0] < w[1]));
    assert!(observed.len() < 10);
    assert_eq!(stats.forwarded, 10);
    assert_eq!(stats.forwarded - stats.dropped, observed.len());
  }

  #[tokio::test(start_paused = true)]
  async fn test_buffered_output_keeps_the_newest() {
    init_tracing();
    let config = Config::from([ConfigOption::with_ring_capacity(5)]);
    let (input, rx) = flume::bounded(0);
    let (ring_buffer, output) = RingBuffer::with_config(rx, &config);
    let runner = ring_buffer.spawn();

    produce(input, 10).await;
    let stats = runner.await.unwrap();

    assert_eq!(consume(output).await, vec![5, 6, 7, 8, 9]);
    assert_eq!(stats, RingStats { forwarded: 10, dropped: 5 });
  }

  #[tokio::test]
  async fn test_active_consumer_accounts_for_every_value() {
    init_tracing();
    let (input, rx) = flume::bounded(1);
    let (ring_buffer, output) = RingBuffer::new(rx, 1);
    let runner = ring_buffer.spawn();
    let consumer = tokio::spawn(consume(output));

    produce(input, 100).await;

    let observed = consumer.await.unwrap();
    let stats = runner.await.unwrap();
    assert_eq!(observed.last(), Some(&99));
    assert!(observed.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(stats.forwarded - stats.dropped, observed.len());
  }

  #[tokio::test]
  async fn test_closing_input_closes_output() {
    init_tracing();
    let (input, rx) = flume::bounded::<u32>(1);
    let (ring_buffer, output) = RingBuffer::new(rx, 1);
    let runner = ring_buffer.spawn();

    drop(input);
    assert_eq!(runner.await.unwrap(), RingStats::default());
    assert!(output.recv_async().await.is_err());
  }

  #[tokio::test]
  async fn test_caller_supplied_output_channel() {
    init_tracing();
    let (input, rx) = flume::bounded(0);
    let (output_tx, output_rx) = flume::bounded(2);
    let runner = RingBuffer::from_channel(rx, output_tx, output_rx.clone()).spawn();

    produce(input, 6).await;
    let stats = runner.await.unwrap();

    assert_eq!(consume(output_rx).await, vec![4, 5]);
    assert_eq!(stats, RingStats { forwarded: 6, dropped: 4 });
  }

  #[tokio::test]
  async fn test_dropped_consumer_stops_runner() {
    init_tracing();
    let (input, rx) = flume::bounded(1);
    let (ring_buffer, output) = RingBuffer::new(rx, 1);
    let runner = ring_buffer.spawn();

    drop(output);
    input.send_async(1).await.unwrap();

    let stats = tokio::time::timeout(Duration::from_secs(1), runner)
      .await
      .expect("runner kept running without a consumer")
      .unwrap();
    assert_eq!(stats, RingStats::default());
    assert!(input.send_async(2).await.is_err());
  }
}
