// waypoint/src/positioning/mod.rs

//! The Positioning Bridge: the latest result the external positioning engine
//! produced for each floating element of the current step.

pub mod bridge;

pub use bridge::{PositioningBridge, Rendezvous};

use std::fmt;
use std::sync::Arc;

use crate::core::geometry::Rect;
use crate::core::step::Placement;

/// Which floating element a popper result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PopperRole {
  Beacon,
  Tooltip,
}

impl PopperRole {
  pub fn as_str(&self) -> &'static str {
    match self {
      PopperRole::Beacon => "beacon",
      PopperRole::Tooltip => "tooltip",
    }
  }
}

impl fmt::Display for PopperRole {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// The engine-side instance behind a result. `update` asks the engine to
/// recompute; the fresh result arrives through
/// [`Tour::set_popper`](crate::Tour::set_popper) like any other.
pub trait PopperHandle: Send + Sync {
  fn update(&self);
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PopperOffsets {
  /// The floating element, document-relative.
  pub popper: Rect,
  /// The element it is anchored to.
  pub reference: Rect,
}

/// One computed position, as reported by the positioning engine.
#[derive(Clone)]
pub struct PopperResult {
  pub placement: Placement,
  pub offsets: PopperOffsets,
  /// The engine picked a different side than the one requested.
  pub flipped: bool,
  pub instance: Option<Arc<dyn PopperHandle>>,
}

impl PopperResult {
  pub fn new(placement: Placement, popper: Rect) -> Self {
    Self {
      placement,
      offsets: PopperOffsets {
        popper,
        reference: Rect::default(),
      },
      flipped: false,
      instance: None,
    }
  }

  pub fn reference(mut self, reference: Rect) -> Self {
    self.offsets.reference = reference;
    self
  }

  pub fn flipped(mut self, flipped: bool) -> Self {
    self.flipped = flipped;
    self
  }

  pub fn instance(mut self, instance: Arc<dyn PopperHandle>) -> Self {
    self.instance = Some(instance);
    self
  }

  /// Asks the engine to recompute. No-op when the engine gave no handle.
  pub fn update(&self) {
    if let Some(instance) = &self.instance {
      instance.update();
    }
  }
}

impl fmt::Debug for PopperResult {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PopperResult")
      .field("placement", &self.placement)
      .field("offsets", &self.offsets)
      .field("flipped", &self.flipped)
      .field("has_instance", &self.instance.is_some())
      .finish()
  }
}
