// waypoint/src/core/state.rs

//! The tour's public state vocabulary: the enums recorded in every snapshot,
//! the snapshot itself, partial updates, and committed transitions.

use std::fmt;

/// The operation that produced the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  Init,
  Start,
  Stop,
  Reset,
  Prev,
  Next,
  Go,
  Skip,
  Close,
  Update,
}

impl Action {
  pub fn as_str(&self) -> &'static str {
    match self {
      Action::Init => "init",
      Action::Start => "start",
      Action::Stop => "stop",
      Action::Reset => "reset",
      Action::Prev => "prev",
      Action::Next => "next",
      Action::Go => "go",
      Action::Skip => "skip",
      Action::Close => "close",
      Action::Update => "update",
    }
  }

  /// Actions that leave the current step (and therefore produce `STEP_AFTER`).
  pub fn is_navigation(&self) -> bool {
    matches!(self, Action::Next | Action::Prev | Action::Skip | Action::Close)
  }
}

/// Progress through a single step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
  Init,
  Ready,
  Beacon,
  Tooltip,
  Complete,
  Error,
}

impl Lifecycle {
  pub fn as_str(&self) -> &'static str {
    match self {
      Lifecycle::Init => "init",
      Lifecycle::Ready => "ready",
      Lifecycle::Beacon => "beacon",
      Lifecycle::Tooltip => "tooltip",
      Lifecycle::Complete => "complete",
      Lifecycle::Error => "error",
    }
  }

  /// Transition table for a step that keeps its index.
  ///
  /// INIT -> READY -> (BEACON ->) TOOLTIP. Going back to INIT is always allowed
  /// (navigation, reset, restart) and so is flagging an ERROR.
  pub fn can_transition_to(self, next: Lifecycle) -> bool {
    use Lifecycle::{Beacon, Complete, Error, Init, Ready, Tooltip};

    match (self, next) {
      (a, b) if a == b => true,
      (_, Init) | (_, Error) => true,
      (Init, Ready) => true,
      (Ready, Beacon) | (Ready, Tooltip) => true,
      (Beacon, Tooltip) => true,
      (Tooltip, Complete) => true,
      _ => false,
    }
  }
}

/// Progress through the whole tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
  Idle,
  Ready,
  Running,
  Paused,
  Skipped,
  Finished,
  Error,
}

impl Status {
  pub fn as_str(&self) -> &'static str {
    match self {
      Status::Idle => "idle",
      Status::Ready => "ready",
      Status::Running => "running",
      Status::Paused => "paused",
      Status::Skipped => "skipped",
      Status::Finished => "finished",
      Status::Error => "error",
    }
  }

  /// FINISHED and SKIPPED end a run; only `reset`/`start` leave them.
  pub fn is_terminal(&self) -> bool {
    matches!(self, Status::Finished | Status::Skipped)
  }
}

/// What the user (or host) used to close the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloseOrigin {
  Keyboard,
  Overlay,
  ButtonClose,
  ButtonPrimary,
}

impl CloseOrigin {
  pub fn as_str(&self) -> &'static str {
    match self {
      CloseOrigin::Keyboard => "keyboard",
      CloseOrigin::Overlay => "overlay",
      CloseOrigin::ButtonClose => "button_close",
      CloseOrigin::ButtonPrimary => "button_primary",
    }
  }
}

macro_rules! display_via_as_str {
  ($($ty:ty),*) => {
    $(impl fmt::Display for $ty {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
      }
    })*
  };
}

display_via_as_str!(Action, Lifecycle, Status, CloseOrigin);

/// Public snapshot of the tour, handed to listeners, helpers and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TourState {
  pub action: Action,
  pub controlled: bool,
  pub index: usize,
  pub lifecycle: Lifecycle,
  pub origin: Option<CloseOrigin>,
  pub size: usize,
  pub status: Status,
}

impl Default for TourState {
  fn default() -> Self {
    Self {
      action: Action::Init,
      controlled: false,
      index: 0,
      lifecycle: Lifecycle::Init,
      origin: None,
      size: 0,
      status: Status::Idle,
    }
  }
}

impl TourState {
  pub fn is_running(&self) -> bool {
    self.status == Status::Running
  }

  pub fn is_last_step(&self) -> bool {
    self.size > 0 && self.index + 1 == self.size
  }

  /// Equality over the observable fields; a commit that changes none of them
  /// is not a transition.
  pub(crate) fn same_observable(&self, other: &TourState) -> bool {
    self.action == other.action
      && self.index == other.index
      && self.lifecycle == other.lifecycle
      && self.size == other.size
      && self.status == other.status
      && self.origin == other.origin
  }
}

/// A partial update. Missing fields keep their current value (except where the
/// store documents otherwise, e.g. an index change always restarts the lifecycle).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatePatch {
  pub action: Option<Action>,
  pub index: Option<usize>,
  pub lifecycle: Option<Lifecycle>,
  pub status: Option<Status>,
}

impl StatePatch {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn action(mut self, action: Action) -> Self {
    self.action = Some(action);
    self
  }

  pub fn index(mut self, index: usize) -> Self {
    self.index = Some(index);
    self
  }

  pub fn lifecycle(mut self, lifecycle: Lifecycle) -> Self {
    self.lifecycle = Some(lifecycle);
    self
  }

  pub fn status(mut self, status: Status) -> Self {
    self.status = Some(status);
    self
  }

  pub fn is_empty(&self) -> bool {
    self.action.is_none() && self.index.is_none() && self.lifecycle.is_none() && self.status.is_none()
  }
}

/// One committed transition, as observed by every listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
  pub previous: TourState,
  pub current: TourState,
}

impl StateChange {
  pub fn index_changed(&self) -> bool {
    self.previous.index != self.current.index
  }

  pub fn lifecycle_changed(&self) -> bool {
    self.previous.lifecycle != self.current.lifecycle
  }

  pub fn status_changed(&self) -> bool {
    self.previous.status != self.current.status
  }

  pub fn action_changed(&self) -> bool {
    self.previous.action != self.current.action
  }

  pub fn lifecycle_became(&self, to: Lifecycle) -> bool {
    self.lifecycle_changed() && self.current.lifecycle == to
  }

  pub fn lifecycle_moved(&self, from: &[Lifecycle], to: Lifecycle) -> bool {
    self.lifecycle_became(to) && from.contains(&self.previous.lifecycle)
  }

  pub fn status_became(&self, to: &[Status]) -> bool {
    self.status_changed() && to.contains(&self.current.status)
  }

  pub fn status_moved(&self, from: &[Status], to: Status) -> bool {
    self.status_changed() && self.current.status == to && from.contains(&self.previous.status)
  }

  /// The action changed into one that leaves the current step.
  ///
  /// Every READY -> BEACON/TOOLTIP update records `Action::Update`; that is
  /// what makes a repeated NEXT/PREV count as a change here.
  pub fn is_after_action(&self) -> bool {
    self.action_changed() && self.current.action.is_navigation()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn lifecycle_cannot_skip_ready() {
    assert!(!Lifecycle::Init.can_transition_to(Lifecycle::Tooltip));
    assert!(!Lifecycle::Init.can_transition_to(Lifecycle::Beacon));
    assert!(Lifecycle::Init.can_transition_to(Lifecycle::Ready));
    assert!(Lifecycle::Ready.can_transition_to(Lifecycle::Tooltip));
    assert!(Lifecycle::Beacon.can_transition_to(Lifecycle::Tooltip));
    assert!(Lifecycle::Tooltip.can_transition_to(Lifecycle::Init));
    assert!(!Lifecycle::Tooltip.can_transition_to(Lifecycle::Beacon));
  }

  #[test]
  fn after_action_requires_a_changed_navigation_action() {
    let previous = TourState {
      action: Action::Update,
      lifecycle: Lifecycle::Tooltip,
      status: Status::Running,
      size: 3,
      ..TourState::default()
    };
    let current = TourState {
      action: Action::Next,
      index: 1,
      lifecycle: Lifecycle::Init,
      ..previous
    };
    let change = StateChange { previous, current };
    assert!(change.is_after_action());
    assert!(change.lifecycle_moved(&[Lifecycle::Tooltip, Lifecycle::Init], Lifecycle::Init));

    let repeat = StateChange {
      previous: current,
      current: TourState { index: 2, ..current },
    };
    assert!(!repeat.is_after_action());
  }
}
