use tokio::sync::mpsc;

use crate::Config;

/// Merges several receivers into one.
///
/// One relay task per source forwards values as they arrive. Order is kept per
/// source only. The merged receiver closes once every source has closed; with no
/// sources it is closed from the start.
pub fn fan_in<T>(inputs: impl IntoIterator<Item = mpsc::Receiver<T>>) -> mpsc::Receiver<T>
where
  T: Send + 'static, {
  fan_in_with_config(inputs, &Config::default())
}

pub fn fan_in_with_config<T>(inputs: impl IntoIterator<Item = mpsc::Receiver<T>>, config: &Config) -> mpsc::Receiver<T>
where
  T: Send + 'static, {
  let (sender, receiver) = mpsc::channel(config.effective_channel_capacity());
  for (source, mut input) in inputs.into_iter().enumerate() {
    let sender = sender.clone();
    tokio::spawn(async move {
      tracing::debug!(source, "fan-in relay started");
      while let Some(value) = input.recv().await {
        if sender.send(value).await.is_err() {
          tracing::warn!(source, "fan-in output dropped, relay stopping");
          return;
        }
      }
      tracing::debug!(source, "fan-in source closed");
    });
  }
  receiver
}
