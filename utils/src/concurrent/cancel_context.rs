use std::sync::Arc;

use async_trait::async_trait;
use once_cell::sync::OnceCell;
use thiserror::Error;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

// Stand-in for "never": roughly 30 years ahead, as tokio does for far-future timers.
pub(crate) const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// `start + after`, capped at [`FAR_FUTURE`] so huge durations cannot overflow.
pub(crate) fn saturating_deadline(start: Instant, after: Duration) -> Instant {
  start
    .checked_add(after)
    .filter(|_| after <= FAR_FUTURE)
    .unwrap_or_else(|| start + FAR_FUTURE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum CancelReason {
  #[error("cancelled")]
  Cancelled,
  #[error("deadline exceeded")]
  DeadlineExceeded,
}

/// An external stop request that can be awaited and asked why it fired.
#[async_trait]
pub trait CancelSignal: Send + Sync {
  /// Resolves once the signal has fired.
  async fn done(&self);

  /// `None` while the signal has not fired.
  fn reason(&self) -> Option<CancelReason>;
}

#[derive(Debug)]
struct CancelContextInner {
  token: CancellationToken,
  deadline: Option<Instant>,
  reason: OnceCell<CancelReason>,
}

/// Cancellation signal with an optional deadline. Clones share state.
#[derive(Debug, Clone)]
pub struct CancelContext {
  inner: Arc<CancelContextInner>,
}

impl CancelContext {
  pub fn new() -> Self {
    Self::build(None)
  }

  pub fn with_timeout(timeout: Duration) -> Self {
    Self::build(Some(saturating_deadline(Instant::now(), timeout)))
  }

  pub fn with_deadline(deadline: Instant) -> Self {
    Self::build(Some(deadline))
  }

  fn build(deadline: Option<Instant>) -> Self {
    Self {
      inner: Arc::new(CancelContextInner {
        token: CancellationToken::new(),
        deadline,
        reason: OnceCell::new(),
      }),
    }
  }

  pub fn deadline(&self) -> Option<Instant> {
    self.inner.deadline
  }

  /// Fires the signal. The first reason recorded wins.
  pub fn cancel(&self) {
    if self.reason().is_none() {
      let _ = self.inner.reason.set(CancelReason::Cancelled);
    }
    self.inner.token.cancel();
  }

  pub fn is_done(&self) -> bool {
    self.reason().is_some()
  }

  pub async fn done(&self) {
    match self.inner.deadline {
      Some(deadline) => {
        tokio::select! {
          _ = self.inner.token.cancelled() => {}
          _ = tokio::time::sleep_until(deadline) => {
            let _ = self.inner.reason.set(CancelReason::DeadlineExceeded);
          }
        }
      }
      None => self.inner.token.cancelled().await,
    }
  }

  pub fn reason(&self) -> Option<CancelReason> {
    if let Some(reason) = self.inner.reason.get() {
      return Some(*reason);
    }
    match self.inner.deadline {
      Some(deadline) if Instant::now() >= deadline => {
        Some(*self.inner.reason.get_or_init(|| CancelReason::DeadlineExceeded))
      }
      _ => None,
    }
  }
}

impl Default for CancelContext {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl CancelSignal for CancelContext {
  async fn done(&self) {
    CancelContext::done(self).await
  }

  fn reason(&self) -> Option<CancelReason> {
    CancelContext::reason(self)
  }
}

#[async_trait]
impl CancelSignal for CancellationToken {
  async fn done(&self) {
    self.cancelled().await
  }

  fn reason(&self) -> Option<CancelReason> {
    self.is_cancelled().then_some(CancelReason::Cancelled)
  }
}
