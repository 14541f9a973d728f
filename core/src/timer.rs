// waypoint/src/timer.rs

//! Cancellable one-shot delays for the short "settle" checks.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Holds at most one pending callback. Scheduling replaces (and aborts) the
/// previous one; dropping the timer aborts whatever is pending.
#[derive(Debug, Default)]
pub(crate) struct Timer {
  task: Mutex<Option<JoinHandle<()>>>,
}

impl Timer {
  /// Runs `callback` after `delay` on the current tokio runtime. Without a
  /// runtime the callback runs immediately, on the caller's thread.
  pub(crate) fn schedule<F>(&self, delay: Duration, callback: F)
  where
    F: FnOnce() + Send + 'static,
  {
    let Ok(handle) = Handle::try_current() else {
      self.cancel();
      callback();
      return;
    };
    let task = handle.spawn(async move {
      tokio::time::sleep(delay).await;
      callback();
    });
    if let Some(previous) = self.task.lock().replace(task) {
      previous.abort();
    }
  }

  pub(crate) fn cancel(&self) {
    if let Some(task) = self.task.lock().take() {
      task.abort();
    }
  }
}

impl Drop for Timer {
  fn drop(&mut self) {
    if let Some(task) = self.task.get_mut().take() {
      task.abort();
    }
  }
}
