use std::future::Future;
use std::panic::{self, AssertUnwindSafe};

use futures::FutureExt;

/// Outcome of a callback run under fault containment.
///
/// The fault itself is never carried: callers that need the error detail
/// capture it inside the callback.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guarded {
  Completed,
  Suppressed,
}

impl Guarded {
  pub fn is_completed(&self) -> bool {
    matches!(self, Guarded::Completed)
  }

  pub fn is_suppressed(&self) -> bool {
    matches!(self, Guarded::Suppressed)
  }
}

/// Runs an async fallible callback, swallowing both an `Err` result and a panic.
pub async fn contain<F, Fut, E>(f: F) -> Guarded
where
  F: FnOnce() -> Fut,
  Fut: Future<Output = Result<(), E>>, {
  let result = AssertUnwindSafe(async move { f().await }).catch_unwind().await;
  outcome(result.map(|r| r.is_ok()))
}

/// Synchronous counterpart of [`contain`].
pub fn contain_sync<F, E>(f: F) -> Guarded
where
  F: FnOnce() -> Result<(), E>, {
  let result = panic::catch_unwind(AssertUnwindSafe(f));
  outcome(result.map(|r| r.is_ok()))
}

fn outcome<P>(result: Result<bool, P>) -> Guarded {
  match result {
    Ok(true) => Guarded::Completed,
    Ok(false) => {
      tracing::warn!("callback returned an error, suppressed");
      Guarded::Suppressed
    }
    Err(_) => {
      tracing::warn!("callback panicked, suppressed");
      Guarded::Suppressed
    }
  }
}

#[cfg(test)]
mod tests;
