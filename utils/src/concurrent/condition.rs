use std::future::{pending, Future};

use tokio::time::{Duration, Instant, MissedTickBehavior};

use crate::concurrent::cancel_context::{saturating_deadline, CancelReason, CancelSignal, FAR_FUTURE};
use crate::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollOutcome {
  Satisfied,
  TimedOut,
  Cancelled(CancelReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
  pub iterations: usize,
  pub elapsed: Duration,
  pub outcome: PollOutcome,
}

impl PollReport {
  pub fn satisfied(&self) -> bool {
    matches!(self.outcome, PollOutcome::Satisfied)
  }
}

/// State of one bounded polling run.
#[derive(Debug)]
struct PollSession {
  started_at: Instant,
  deadline: Instant,
  interval: Duration,
  iterations: usize,
}

impl PollSession {
  fn new(timeout: Duration, interval: Duration) -> Self {
    let started_at = Instant::now();
    Self {
      started_at,
      deadline: saturating_deadline(started_at, timeout),
      // tokio intervals reject a zero period
      interval: interval.clamp(Duration::from_millis(1), FAR_FUTURE),
      iterations: 0,
    }
  }

  fn report(&self, outcome: PollOutcome) -> PollReport {
    PollReport {
      iterations: self.iterations,
      elapsed: self.started_at.elapsed(),
      outcome,
    }
  }

  async fn run<P, C>(mut self, mut predicate: P, cancelled: C) -> PollReport
  where
    P: FnMut() -> bool,
    C: Future<Output = CancelReason>, {
    let mut ticker = tokio::time::interval_at(saturating_deadline(self.started_at, self.interval), self.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(cancelled);

    loop {
      self.iterations += 1;
      if predicate() {
        return self.report(PollOutcome::Satisfied);
      }
      tokio::select! {
        biased;
        reason = &mut cancelled => {
          tracing::debug!(iterations = self.iterations, ?reason, "condition poll cancelled");
          return self.report(PollOutcome::Cancelled(reason));
        }
        _ = tokio::time::sleep_until(self.deadline) => {
          tracing::debug!(iterations = self.iterations, "condition poll timed out");
          return self.report(PollOutcome::TimedOut);
        }
        _ = ticker.tick() => {}
      }
    }
  }
}

/// Polls `predicate` every `interval` until it holds or `timeout` elapses.
///
/// The predicate is checked once before any waiting, so a `timeout` shorter
/// than `interval` still gets one evaluation.
pub async fn wait_for<P>(predicate: P, timeout: Duration, interval: Duration) -> bool
where
  P: FnMut() -> bool, {
  PollSession::new(timeout, interval)
    .run(predicate, pending::<CancelReason>())
    .await
    .satisfied()
}

/// [`wait_for`] using the poll timeout and interval of `config`.
pub async fn wait_for_with_config<P>(predicate: P, config: &Config) -> bool
where
  P: FnMut() -> bool, {
  wait_for(predicate, config.poll_timeout, config.poll_interval).await
}

/// Like [`wait_for`], but also stops when `signal` fires, and reports how the
/// session went.
pub async fn wait_for_with_cancel<S, P>(signal: &S, predicate: P, timeout: Duration, interval: Duration) -> PollReport
where
  S: CancelSignal + ?Sized,
  P: FnMut() -> bool, {
  let cancelled = async {
    signal.done().await;
    signal.reason().unwrap_or(CancelReason::Cancelled)
  };
  PollSession::new(timeout, interval).run(predicate, cancelled).await
}
