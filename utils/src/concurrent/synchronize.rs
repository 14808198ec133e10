use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::Semaphore;

use crate::concurrent::fault::{contain, contain_sync, Guarded};

/// A mutual-exclusion primitive split into explicit acquire and release steps.
///
/// `release` is only ever called by the holder of a successful `acquire`.
#[async_trait]
pub trait Locker: Debug + Send + Sync {
  async fn acquire(&self);

  fn release(&self);
}

#[async_trait]
impl<L: Locker + ?Sized> Locker for Arc<L> {
  async fn acquire(&self) {
    (**self).acquire().await
  }

  fn release(&self) {
    (**self).release()
  }
}

/// Default lock: a single-permit semaphore.
#[derive(Debug)]
pub struct ExclusiveLock {
  semaphore: Semaphore,
}

impl ExclusiveLock {
  pub fn new() -> Self {
    Self {
      semaphore: Semaphore::new(1),
    }
  }
}

impl Default for ExclusiveLock {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl Locker for ExclusiveLock {
  async fn acquire(&self) {
    // The semaphore is never closed, so acquisition only fails in theory.
    if let Ok(permit) = self.semaphore.acquire().await {
      permit.forget();
    }
  }

  fn release(&self) {
    self.semaphore.add_permits(1);
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardConfigError {
  #[error("expected at most one lock, got {0}")]
  TooManyLocks(usize),
}

struct ReleaseOnDrop<'a, L: Locker + ?Sized>(&'a L);

impl<L: Locker + ?Sized> Drop for ReleaseOnDrop<'_, L> {
  fn drop(&mut self) {
    self.0.release();
  }
}

/// Runs callbacks one at a time under a lock.
///
/// A failing callback, whether it returns `Err` or panics, is suppressed and the
/// lock is released before `run` returns. Side effects of the failed callback are
/// left as they are.
#[derive(Debug)]
pub struct Synchronize<L: Locker = ExclusiveLock> {
  locker: L,
}

impl Synchronize<ExclusiveLock> {
  pub fn new() -> Self {
    Self::with_lock(ExclusiveLock::new())
  }
}

impl Default for Synchronize<ExclusiveLock> {
  fn default() -> Self {
    Self::new()
  }
}

impl<L: Locker> Synchronize<L> {
  pub fn with_lock(locker: L) -> Self {
    Self { locker }
  }

  /// Builds a guard from zero or one lock. No lock means a fresh private one.
  pub fn from_locks(locks: impl IntoIterator<Item = L>) -> Result<Self, GuardConfigError>
  where
    L: Default, {
    let mut locks = locks.into_iter().collect::<Vec<_>>();
    match locks.len() {
      0 => Ok(Self::with_lock(L::default())),
      1 => Ok(Self::with_lock(locks.remove(0))),
      n => {
        tracing::error!(locks = n, "synchronize accepts at most one lock");
        Err(GuardConfigError::TooManyLocks(n))
      }
    }
  }

  pub fn locker(&self) -> &L {
    &self.locker
  }

  pub async fn run<F, Fut, E>(&self, f: F) -> Guarded
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<(), E>>, {
    self.locker.acquire().await;
    let _release = ReleaseOnDrop(&self.locker);
    contain(f).await
  }

  pub async fn run_sync<F, E>(&self, f: F) -> Guarded
  where
    F: FnOnce() -> Result<(), E>, {
    self.locker.acquire().await;
    let _release = ReleaseOnDrop(&self.locker);
    contain_sync(f)
  }
}
