use crate::Config;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOption {
  SetChannelCapacity(usize),
  SetRingCapacity(usize),
  SetPollInterval(Duration),
  SetPollTimeout(Duration),
}

impl ConfigOption {
  pub(crate) fn apply(&self, config: &mut Config) {
    match self {
      ConfigOption::SetChannelCapacity(capacity) => {
        config.channel_capacity = *capacity;
      }
      ConfigOption::SetRingCapacity(capacity) => {
        config.ring_capacity = *capacity;
      }
      ConfigOption::SetPollInterval(interval) => {
        config.poll_interval = *interval;
      }
      ConfigOption::SetPollTimeout(timeout) => {
        config.poll_timeout = *timeout;
      }
    }
  }

  pub fn with_channel_capacity(capacity: usize) -> ConfigOption {
    ConfigOption::SetChannelCapacity(capacity)
  }

  pub fn with_ring_capacity(capacity: usize) -> ConfigOption {
    ConfigOption::SetRingCapacity(capacity)
  }

  pub fn with_poll_interval(interval: Duration) -> ConfigOption {
    ConfigOption::SetPollInterval(interval)
  }

  pub fn with_poll_timeout(timeout: Duration) -> ConfigOption {
    ConfigOption::SetPollTimeout(timeout)
  }
}
