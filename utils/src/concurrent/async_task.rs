use std::future::Future;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

use thiserror::Error;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
  #[error("task ended without delivering a value")]
  Aborted,
  #[error("task value was already delivered")]
  AlreadyDelivered,
}

/// One-shot delivery of the result of a launched computation.
///
/// Awaiting the handle yields the value once; the handle is spent afterwards.
/// Dropping the handle does not stop the computation.
#[derive(Debug)]
pub struct TaskHandle<T> {
  receiver: Option<oneshot::Receiver<T>>,
}

impl<T> TaskHandle<T> {
  fn new(receiver: oneshot::Receiver<T>) -> Self {
    Self {
      receiver: Some(receiver),
    }
  }

  /// Returns `true` once the handle can produce nothing more.
  pub fn is_delivered(&self) -> bool {
    self.receiver.is_none()
  }

  /// Takes the value if the computation already finished, without waiting.
  pub fn try_take(&mut self) -> Result<Option<T>, TaskError> {
    let receiver = self.receiver.as_mut().ok_or(TaskError::AlreadyDelivered)?;
    match receiver.try_recv() {
      Ok(value) => {
        self.receiver = None;
        Ok(Some(value))
      }
      Err(TryRecvError::Empty) => Ok(None),
      Err(TryRecvError::Closed) => {
        self.receiver = None;
        Err(TaskError::Aborted)
      }
    }
  }
}

impl<T> Future for TaskHandle<T> {
  type Output = Result<T, TaskError>;

  fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    let Some(receiver) = self.receiver.as_mut() else {
      return Poll::Ready(Err(TaskError::AlreadyDelivered));
    };
    let result = ready!(Pin::new(receiver).poll(cx));
    self.receiver = None;
    Poll::Ready(result.map_err(|_| TaskError::Aborted))
  }
}

fn deliver<T>(sender: oneshot::Sender<T>, value: T) {
  if sender.send(value).is_err() {
    tracing::debug!("task handle dropped before delivery");
  }
}

/// Spawns `future` on its own tokio task and returns a handle to its output.
///
/// There is no queueing or backpressure: every call spawns immediately.
pub fn launch<F, T>(future: F) -> TaskHandle<T>
where
  F: Future<Output = T> + Send + 'static,
  T: Send + 'static, {
  let (sender, receiver) = oneshot::channel();
  tokio::spawn(async move {
    deliver(sender, future.await);
  });
  TaskHandle::new(receiver)
}

/// Runs a synchronous closure on the blocking pool.
pub fn launch_blocking<F, T>(f: F) -> TaskHandle<T>
where
  F: FnOnce() -> T + Send + 'static,
  T: Send + 'static, {
  let (sender, receiver) = oneshot::channel();
  tokio::task::spawn_blocking(move || {
    deliver(sender, f());
  });
  TaskHandle::new(receiver)
}

/// Spawns a fallible future and splits its result into a value handle and an
/// error handle. Both handles always deliver: exactly one of them carries `Some`.
pub fn launch_with_error<F, T, E>(future: F) -> (TaskHandle<Option<T>>, TaskHandle<Option<E>>)
where
  F: Future<Output = Result<T, E>> + Send + 'static,
  T: Send + 'static,
  E: Send + 'static, {
  let (value_sender, value_receiver) = oneshot::channel();
  let (error_sender, error_receiver) = oneshot::channel();
  tokio::spawn(async move {
    let (value, error) = match future.await {
      Ok(value) => (Some(value), None),
      Err(error) => (None, Some(error)),
    };
    deliver(value_sender, value);
    deliver(error_sender, error);
  });
  (TaskHandle::new(value_receiver), TaskHandle::new(error_receiver))
}
