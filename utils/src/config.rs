use crate::ConfigOption;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
  pub channel_capacity: usize,
  pub ring_capacity: usize,
  pub poll_interval: Duration,
  pub poll_timeout: Duration,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      channel_capacity: 1,
      ring_capacity: 1,
      poll_interval: Duration::from_millis(10),
      poll_timeout: Duration::from_secs(1),
    }
  }
}

impl Config {
  pub fn from(options: impl IntoIterator<Item = ConfigOption>) -> Config {
    let mut config = Config::default();
    for option in options {
      option.apply(&mut config);
    }
    config
  }

  // tokio channels reject a zero capacity.
  pub(crate) fn effective_channel_capacity(&self) -> usize {
    self.channel_capacity.max(1)
  }

  pub(crate) fn effective_ring_capacity(&self) -> usize {
    self.ring_capacity.max(1)
  }
}
