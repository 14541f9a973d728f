// waypoint/src/lifecycle/focus.rs

//! Keyboard-focus resources owned by the current step.

use std::sync::Arc;
use std::time::Duration;

use tracing::{event, Level};

use crate::timer::Timer;

/// Host-side focus handling. Trapping focus inside the tooltip is the host's
/// business; the tour only says when a scope begins and ends.
pub trait FocusManager: Send + Sync {
  /// Focus the tooltip's primary action and keep tab focus inside the tooltip.
  fn trap_tooltip(&self, index: usize);

  fn release_tooltip(&self, index: usize);

  fn focus_beacon(&self, index: usize);
}

/// Ignores every request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoFocus;

impl FocusManager for NoFocus {
  fn trap_tooltip(&self, _index: usize) {}

  fn release_tooltip(&self, _index: usize) {}

  fn focus_beacon(&self, _index: usize) {}
}

/// An acquired tooltip focus scope. Released exactly once, on drop.
#[must_use = "the focus scope is released as soon as the guard is dropped"]
pub struct FocusScopeGuard {
  manager: Arc<dyn FocusManager>,
  index: usize,
}

impl FocusScopeGuard {
  pub fn acquire(manager: Arc<dyn FocusManager>, index: usize) -> Self {
    event!(Level::TRACE, index, "Tooltip focus scope acquired.");
    manager.trap_tooltip(index);
    Self { manager, index }
  }

  pub fn index(&self) -> usize {
    self.index
  }
}

impl std::fmt::Debug for FocusScopeGuard {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("FocusScopeGuard").field("index", &self.index).finish()
  }
}

impl Drop for FocusScopeGuard {
  fn drop(&mut self) {
    event!(Level::TRACE, index = self.index, "Tooltip focus scope released.");
    self.manager.release_tooltip(self.index);
  }
}

/// Moves focus to the beacon shortly after it mounts.
#[derive(Debug, Default)]
pub(crate) struct BeaconFocus {
  timer: Timer,
}

impl BeaconFocus {
  pub(crate) const DELAY: Duration = Duration::ZERO;

  pub(crate) fn schedule(&self, manager: Arc<dyn FocusManager>, index: usize) {
    self.timer.schedule(Self::DELAY, move || manager.focus_beacon(index));
  }

  pub(crate) fn cancel(&self) {
    self.timer.cancel();
  }
}
