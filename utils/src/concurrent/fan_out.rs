use tokio::sync::mpsc;
use tokio::sync::mpsc::error::SendError;

use crate::Config;

/// Splits `input` into `n` receivers, dealing values round-robin.
///
/// A single distributor task sends each value to the next output in turn and
/// waits until that output accepts it, so one slow consumer stalls all of them.
/// When `input` closes every output is closed. With `n == 0` input is drained and
/// discarded. An output whose receiver was dropped leaves the rotation and its
/// value goes to the next live output.
pub fn fan_out<T>(input: mpsc::Receiver<T>, n: usize) -> Vec<mpsc::Receiver<T>>
where
  T: Send + 'static, {
  fan_out_with_config(input, n, &Config::default())
}

pub fn fan_out_with_config<T>(input: mpsc::Receiver<T>, n: usize, config: &Config) -> Vec<mpsc::Receiver<T>>
where
  T: Send + 'static, {
  let (senders, receivers): (Vec<_>, Vec<_>) = (0..n)
    .map(|_| mpsc::channel(config.effective_channel_capacity()))
    .unzip();
  tokio::spawn(distribute(input, senders));
  receivers
}

async fn distribute<T>(mut input: mpsc::Receiver<T>, mut outputs: Vec<mpsc::Sender<T>>) {
  tracing::debug!(outputs = outputs.len(), "fan-out distributor started");
  let mut next = 0;
  let mut discarded = 0usize;

  while let Some(mut value) = input.recv().await {
    loop {
      if outputs.is_empty() {
        discarded += 1;
        break;
      }
      let index = next % outputs.len();
      match outputs[index].send(value).await {
        Ok(()) => {
          next = index + 1;
          break;
        }
        Err(SendError(returned)) => {
          tracing::warn!(output = index, "fan-out output dropped, removing it from rotation");
          outputs.remove(index);
          next = index;
          value = returned;
        }
      }
    }
  }

  tracing::debug!(discarded, "fan-out input closed, closing outputs");
}
