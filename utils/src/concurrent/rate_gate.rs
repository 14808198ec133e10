use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant};

/// Whether an invocation passed the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Valve {
  Open,
  Closed,
}

pub struct GateCallback<A>(Arc<dyn Fn(A) + Send + Sync + 'static>);

impl<A> GateCallback<A> {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(A) + Send + Sync + 'static, {
    Self(Arc::new(f))
  }

  pub fn run(&self, args: A) {
    (self.0)(args)
  }
}

impl<A> Clone for GateCallback<A> {
  fn clone(&self) -> Self {
    Self(Arc::clone(&self.0))
  }
}

impl<A> Debug for GateCallback<A> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("GateCallback").finish_non_exhaustive()
  }
}

/// Runs the callback at most once per `window`; calls inside the window are dropped.
///
/// `call` takes `&mut self`: callers sharing one throttle across tasks wrap it in
/// a lock themselves.
#[derive(Debug)]
pub struct Throttle<A> {
  callback: GateCallback<A>,
  window: Duration,
  last_call: Option<Instant>,
}

impl<A> Throttle<A> {
  pub fn new(callback: GateCallback<A>, window: Duration) -> Self {
    Self {
      callback,
      window,
      last_call: None,
    }
  }

  pub fn window(&self) -> Duration {
    self.window
  }

  pub fn call(&mut self, args: A) -> Valve {
    let now = Instant::now();
    if let Some(last_call) = self.last_call {
      if now.duration_since(last_call) < self.window {
        return Valve::Closed;
      }
    }
    self.last_call = Some(now);
    self.callback.run(args);
    Valve::Open
  }

  /// Forgets the last execution so the next call passes.
  pub fn reset(&mut self) {
    self.last_call = None;
  }
}

/// Defers the callback until `delay` has passed without another call.
///
/// Each call replaces the pending one, so only the last arguments are used. A call
/// still pending when the gate is dropped fires as scheduled. Requires a tokio
/// runtime.
#[derive(Debug)]
pub struct Debounce<A> {
  callback: GateCallback<A>,
  delay: Duration,
  pending: Option<JoinHandle<()>>,
}

impl<A: Send + 'static> Debounce<A> {
  pub fn new(callback: GateCallback<A>, delay: Duration) -> Self {
    Self {
      callback,
      delay,
      pending: None,
    }
  }

  pub fn delay(&self) -> Duration {
    self.delay
  }

  pub fn call(&mut self, args: A) {
    if self.cancel() {
      tracing::trace!("debounce: pending call superseded");
    }
    let callback = self.callback.clone();
    let delay = self.delay;
    self.pending = Some(tokio::spawn(async move {
      tokio::time::sleep(delay).await;
      callback.run(args);
    }));
  }

  /// Drops the pending call. Returns `true` if one was armed.
  pub fn cancel(&mut self) -> bool {
    match self.pending.take() {
      Some(handle) if !handle.is_finished() => {
        handle.abort();
        true
      }
      _ => false,
    }
  }

  pub fn is_pending(&self) -> bool {
    self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
  }
}
