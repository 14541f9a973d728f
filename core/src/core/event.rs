// waypoint/src/core/event.rs

//! The host-visible event stream.

use std::fmt;
use std::sync::Arc;

use crate::core::state::TourState;
use crate::core::step::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
  TourStart,
  StepBefore,
  Beacon,
  Tooltip,
  StepAfter,
  TourEnd,
  TargetNotFound,
  TourStatus,
  Error,
}

impl EventKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      EventKind::TourStart => "tour:start",
      EventKind::StepBefore => "step:before",
      EventKind::Beacon => "beacon",
      EventKind::Tooltip => "tooltip",
      EventKind::StepAfter => "step:after",
      EventKind::TourEnd => "tour:end",
      EventKind::TargetNotFound => "error:target_not_found",
      EventKind::TourStatus => "tour:status",
      EventKind::Error => "error",
    }
  }
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One entry of the event stream.
///
/// `state` is the public snapshot at emission time, with `index`/`lifecycle`
/// rewritten where the event concerns a step that was just left (`STEP_AFTER`
/// carries the previous index and `COMPLETE`).
#[derive(Debug, Clone)]
pub struct TourEvent {
  pub kind: EventKind,
  pub state: TourState,
  pub step: Option<Arc<Step>>,
  /// Rendered error for `ERROR` / `TARGET_NOT_FOUND`.
  pub message: Option<String>,
}

impl TourEvent {
  pub fn new(kind: EventKind, state: TourState, step: Option<Arc<Step>>) -> Self {
    Self {
      kind,
      state,
      step,
      message: None,
    }
  }

  pub fn with_message(mut self, message: impl Into<String>) -> Self {
    self.message = Some(message.into());
    self
  }

  pub fn index(&self) -> usize {
    self.state.index
  }
}
