use tokio::task::JoinHandle;

use crate::Config;

/// Counters returned when a [`RingBuffer`] finishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RingStats {
  pub forwarded: usize,
  pub dropped: usize,
}

/// Forwards values from `input` to an output channel without ever blocking on a
/// full output: the oldest unread value is evicted to make room.
///
/// The output is meant for a single consumer. Several consumers racing for the
/// freed slot is not supported. The runner stops early once no consumer
/// receiver is left besides its own eviction handle.
#[derive(Debug)]
pub struct RingBuffer<T> {
  input: flume::Receiver<T>,
  output: flume::Sender<T>,
  evict: flume::Receiver<T>,
}

impl<T: Send + 'static> RingBuffer<T> {
  /// Returns the buffer together with the consumer end of its output.
  pub fn new(input: flume::Receiver<T>, capacity: usize) -> (Self, flume::Receiver<T>) {
    let (output, consumer) = flume::bounded(capacity.max(1));
    let ring_buffer = Self::from_channel(input, output, consumer.clone());
    (ring_buffer, consumer)
  }

  /// Uses a caller-supplied output channel. `evict` is a receiver of that
  /// channel kept for dropping unread values; the consumer reads through another
  /// clone.
  pub fn from_channel(input: flume::Receiver<T>, output: flume::Sender<T>, evict: flume::Receiver<T>) -> Self {
    Self { input, output, evict }
  }

  pub fn with_config(input: flume::Receiver<T>, config: &Config) -> (Self, flume::Receiver<T>) {
    Self::new(input, config.effective_ring_capacity())
  }

  /// Runs until `input` closes or the consumer goes away, then closes the output.
  pub async fn run(self) -> RingStats {
    let mut stats = RingStats::default();
    tracing::debug!("ring buffer started");

    while let Ok(value) = self.input.recv_async().await {
      if self.output.receiver_count() <= 1 {
        tracing::debug!("ring buffer consumer dropped, stopping");
        break;
      }
      if let Err(err) = self.output.try_send(value) {
        if self.evict.try_recv().is_ok() {
          stats.dropped += 1;
          tracing::debug!(dropped = stats.dropped, "ring buffer evicted an unread value");
        }
        // `evict` keeps the channel connected, so this cannot fail; it only
        // waits if a second producer refilled the slot.
        let _ = self.output.send_async(err.into_inner()).await;
      }
      stats.forwarded += 1;
    }

    tracing::debug!(forwarded = stats.forwarded, dropped = stats.dropped, "ring buffer finished");
    stats
  }

  pub fn spawn(self) -> JoinHandle<RingStats> {
    tokio::spawn(self.run())
  }
}

#[cfg(test)]
mod tests;
