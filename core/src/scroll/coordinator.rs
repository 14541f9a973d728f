// waypoint/src/scroll/coordinator.rs

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{event, Level};

use crate::dom::ScrollContainer;
use crate::error::{TourError, TourResult};
use crate::scroll::ScrollDriver;

/// Delay between the end of the animation and the popper recomputation.
pub const POST_SCROLL_REFRESH: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollJob {
  /// Step the scroll was started for.
  pub index: usize,
  pub container: ScrollContainer,
  pub top: f64,
  pub duration: Duration,
}

/// Runs at most one scroll animation at a time.
///
/// Every new job (and every [`cancel`](Self::cancel)) bumps a generation
/// counter and aborts the running task; a task that finishes under an older
/// generation never reports back.
pub struct ScrollCoordinator {
  driver: Arc<dyn ScrollDriver>,
  generation: Arc<AtomicU64>,
  task: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for ScrollCoordinator {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ScrollCoordinator")
      .field("generation", &self.generation.load(Ordering::SeqCst))
      .finish_non_exhaustive()
  }
}

impl ScrollCoordinator {
  pub fn new(driver: Arc<dyn ScrollDriver>) -> Self {
    Self {
      driver,
      generation: Arc::new(AtomicU64::new(0)),
      task: Mutex::new(None),
    }
  }

  pub fn generation(&self) -> u64 {
    self.generation.load(Ordering::SeqCst)
  }

  pub fn is_scrolling(&self) -> bool {
    self.task.lock().as_ref().is_some_and(|task| !task.is_finished())
  }

  /// Starts `job`, superseding any animation still in flight.
  ///
  /// `on_done` runs once, [`POST_SCROLL_REFRESH`] after the animation
  /// resolved, and only if nothing superseded the job in the meantime. Returns
  /// `false` (and drops `on_done`) when there is no runtime to animate on.
  pub fn begin<F>(&self, job: ScrollJob, on_done: F) -> bool
  where
    F: FnOnce(TourResult<()>) + Send + 'static,
  {
    let handle = match Handle::try_current() {
      Ok(handle) => handle,
      Err(_) => {
        event!(Level::DEBUG, index = job.index, "No async runtime available; scroll skipped.");
        return false;
      }
    };

    let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
    let current = Arc::clone(&self.generation);
    let driver = Arc::clone(&self.driver);

    event!(
      Level::DEBUG,
      index = job.index,
      top = job.top,
      duration_ms = job.duration.as_millis() as u64,
      generation,
      "Scrolling to step."
    );

    let task = handle.spawn(async move {
      let outcome = driver.scroll_to(job.container, job.top, job.duration).await;
      if current.load(Ordering::SeqCst) != generation {
        return;
      }
      let outcome = match outcome {
        Ok(()) => {
          tokio::time::sleep(POST_SCROLL_REFRESH).await;
          if current.load(Ordering::SeqCst) != generation {
            return;
          }
          Ok(())
        }
        Err(source) => Err(TourError::Scroll { source }),
      };
      on_done(outcome);
    });

    if let Some(previous) = self.task.lock().replace(task) {
      previous.abort();
    }
    true
  }

  /// Invalidates the running animation, if any.
  pub fn cancel(&self) {
    self.generation.fetch_add(1, Ordering::SeqCst);
    if let Some(task) = self.task.lock().take() {
      event!(Level::TRACE, "Scroll animation cancelled.");
      task.abort();
    }
  }
}

impl Drop for ScrollCoordinator {
  fn drop(&mut self) {
    if let Some(task) = self.task.get_mut().take() {
      task.abort();
    }
  }
}
